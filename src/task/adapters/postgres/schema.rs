//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records with auto-classified metadata.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        #[max_length = 200]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Assigned category.
        #[max_length = 50]
        category -> Varchar,
        /// Assigned priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Optional assignee.
        #[max_length = 255]
        assigned_to -> Nullable<Varchar>,
        /// Optional due date.
        due_date -> Nullable<Timestamptz>,
        /// Extracted entity lists payload.
        extracted_entities -> Jsonb,
        /// Suggested action list payload.
        suggested_actions -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only audit records, one per task mutation.
    task_history (id) {
        /// History entry identifier.
        id -> Uuid,
        /// Owning task identifier (cascades on task deletion).
        task_id -> Uuid,
        /// Mutation kind.
        #[max_length = 50]
        action -> Varchar,
        /// Prior-value snapshot, absent for creation entries.
        old_value -> Nullable<Jsonb>,
        /// New-value snapshot or applied patch.
        new_value -> Jsonb,
        /// Actor that performed the mutation.
        #[max_length = 255]
        changed_by -> Varchar,
        /// Write timestamp.
        changed_at -> Timestamptz,
    }
}

diesel::joinable!(task_history -> tasks (task_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_history);
