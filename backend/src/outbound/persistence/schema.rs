//! Diesel table definitions for the user registry.
//!
//! The table is owned by the authentication service; this backend only reads
//! it and appends to `in_progress`.

diesel::table! {
    /// Registered users and the tasks they have sent to moderation.
    users (id) {
        id -> Int4,
        username -> Varchar,
        /// Task ids already submitted for moderation. Null until the first one.
        in_progress -> Nullable<Array<Nullable<Int4>>>,
    }
}
