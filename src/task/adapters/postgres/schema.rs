//! Diesel schema for task persistence.

diesel::table! {
    /// Tasks issued by one user to another.
    tasks (id) {
        /// Task number.
        id -> Int8,
        /// Creator identity.
        owner_id -> Int8,
        /// Assignee identity.
        assignee_id -> Int8,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Identity that last changed the status.
        changed_by -> Int8,
        /// Timestamp of the last status change.
        changed_at -> Timestamptz,
        /// Title.
        title -> Text,
        /// Description.
        description -> Text,
        /// Latest comment.
        comment -> Nullable<Text>,
        /// Latest commenter.
        commented_by -> Nullable<Int8>,
        /// Latest comment timestamp.
        commented_at -> Nullable<Timestamptz>,
        /// Attachment references.
        attachments -> Array<Text>,
    }
}

diesel::table! {
    /// Append-only audit trail written by `tasks_history_trigger`.
    task_history (id) {
        /// Entry identifier.
        id -> Int8,
        /// Task number.
        task_id -> Int8,
        /// Status at the time of the entry.
        #[max_length = 20]
        status -> Varchar,
        /// Actor.
        changed_by -> Int8,
        /// Timestamp.
        changed_at -> Timestamptz,
        /// Comment text for comment entries.
        comment -> Nullable<Text>,
    }
}

diesel::joinable!(task_history -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_history);
