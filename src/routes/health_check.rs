pub async fn handler() -> &'static str {
    "App works fine ☺️"
}
