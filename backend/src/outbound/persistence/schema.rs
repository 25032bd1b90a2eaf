//! Diesel table definitions. Must match `backend/migrations`.

diesel::table! {
    /// Provisioned accounts and their booking role.
    accounts (id) {
        id -> Uuid,
        display_name -> Varchar,
        email -> Varchar,
        /// One of `client`, `doctor`, `admin`.
        role -> Varchar,
        /// Required while the role is `doctor`; cleared on demotion.
        specialization -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Published doctor availability windows.
    availability_windows (id) {
        id -> Uuid,
        doctor_id -> Uuid,
        available_date -> Date,
        start_time -> Time,
        /// Strictly after `start_time` (check constraint).
        end_time -> Time,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Confirmed reservations.
    ///
    /// Unique on `(doctor_id, reservation_date, reservation_time)` and on
    /// `(doctor_id, client_id, reservation_date)`.
    reservations (id) {
        id -> Uuid,
        doctor_id -> Uuid,
        client_id -> Uuid,
        reservation_date -> Date,
        reservation_time -> Time,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// In-app notification inbox.
    notifications (id) {
        id -> Uuid,
        recipient_id -> Uuid,
        kind -> Varchar,
        payload -> Jsonb,
        message -> Text,
        created_at -> Timestamptz,
        read_at -> Nullable<Timestamptz>,
    }
}

diesel::joinable!(availability_windows -> accounts (doctor_id));
diesel::joinable!(notifications -> accounts (recipient_id));

diesel::allow_tables_to_appear_in_same_query!(
    accounts,
    availability_windows,
    notifications,
    reservations,
);
