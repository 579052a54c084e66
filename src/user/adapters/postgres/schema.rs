//! Diesel schema for user persistence.

diesel::table! {
    /// Registered users and their admission status.
    users (id) {
        /// Chat-platform identity.
        id -> Int8,
        /// Given name.
        #[max_length = 255]
        first_name -> Varchar,
        /// Family name.
        #[max_length = 255]
        last_name -> Varchar,
        /// Admin flag.
        is_admin -> Bool,
        /// Admission status.
        #[max_length = 20]
        status -> Varchar,
        /// Identity that last changed the status.
        changed_by -> Int8,
        /// Timestamp of the last status change.
        changed_at -> Timestamptz,
        /// Moderation comment.
        comment -> Text,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}
