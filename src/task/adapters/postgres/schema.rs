//! Diesel schema for task persistence.

diesel::table! {
    /// Task records, including soft-deleted ones.
    tasks (id) {
        /// Internal task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional long-form description.
        description -> Nullable<Text>,
        /// Workflow status.
        #[max_length = 50]
        status -> Varchar,
        /// Priority.
        #[max_length = 50]
        priority -> Varchar,
        /// Kind of work item.
        #[max_length = 50]
        kind -> Varchar,
        /// Optional story point estimate.
        story_points -> Nullable<Int8>,
        /// Optional due date.
        deadline -> Nullable<Date>,
        /// Optional parent task.
        parent_task_id -> Nullable<Uuid>,
        /// Optional sprint membership.
        sprint_id -> Nullable<Uuid>,
        /// Optional assignee.
        assignee_id -> Nullable<Uuid>,
        /// Creating user.
        created_by -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
        /// Soft-deletion timestamp.
        deleted_at -> Nullable<Timestamptz>,
    }
}
