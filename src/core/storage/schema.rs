diesel::table! {
    entries (key) {
        key -> Text,
        value -> Json,
    }
}
