//! Diesel schema for sprint persistence.

diesel::table! {
    /// Sprint records.
    sprints (id) {
        /// Internal sprint identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Sprint name.
        #[max_length = 255]
        name -> Varchar,
        /// Free-text goal.
        goal -> Text,
        /// Start timestamp.
        start_date -> Timestamptz,
        /// End timestamp, set on completion.
        end_date -> Nullable<Timestamptz>,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
