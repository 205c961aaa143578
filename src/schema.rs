diesel::table! {
    user_history (id) {
        id -> BigInt,
        user_id -> BigInt,
        category -> Text,
        request_text -> Text,
        response_text -> Nullable<Text>,
        response_data -> Nullable<Text>,
        created_at -> Timestamp,
        message_id -> Nullable<BigInt>,
    }
}
