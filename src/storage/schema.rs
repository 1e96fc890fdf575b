//! Diesel schema for the account, archive and offline queue tables.

diesel::table! {
    /// Registered accounts keyed by bare JID.
    users (id) {
        /// Internal user identifier.
        id -> Uuid,
        /// Bare JID, unique.
        #[max_length = 512]
        jid -> Varchar,
        /// Display name.
        #[max_length = 256]
        name -> Nullable<Varchar>,
        /// Stored credential.
        #[max_length = 256]
        password -> Nullable<Varchar>,
        /// Serialized vCard document.
        vcard -> Nullable<Text>,
    }
}

diesel::table! {
    /// Roster entries owned by a user.
    contacts (id) {
        /// Internal contact identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Contact bare JID, unique per user.
        #[max_length = 512]
        jid -> Varchar,
        /// Display name chosen by the owner.
        #[max_length = 256]
        name -> Nullable<Varchar>,
        /// Pending subscription request state.
        #[max_length = 128]
        ask -> Nullable<Varchar>,
        /// Presence subscription state.
        #[max_length = 128]
        subscription -> Varchar,
    }
}

diesel::table! {
    /// Roster group names shared across contacts.
    groups (id) {
        /// Internal group identifier.
        id -> Uuid,
        /// Trimmed group name, unique.
        #[max_length = 256]
        name -> Varchar,
    }
}

diesel::table! {
    /// Contact to group membership.
    contacts_groups (contact_id, group_id) {
        /// Member contact.
        contact_id -> Uuid,
        /// Group the contact belongs to.
        group_id -> Uuid,
    }
}

diesel::table! {
    /// Private protocol-extension documents.
    fragments (id) {
        /// Internal fragment identifier.
        id -> Uuid,
        /// Owning user.
        user_id -> Uuid,
        /// Root element name.
        #[max_length = 256]
        root -> Varchar,
        /// Root element namespace.
        #[max_length = 256]
        namespace -> Varchar,
        /// Serialized document.
        xml -> Text,
    }
}

diesel::table! {
    /// One archive collection per unordered pair of bare JIDs.
    collections (id) {
        /// Internal collection identifier.
        id -> Uuid,
        /// Sender of the message that created the collection.
        #[max_length = 512]
        jid_from -> Varchar,
        /// Recipient of the message that created the collection.
        #[max_length = 512]
        jid_with -> Varchar,
        /// Canonical digest of the sorted JID pair.
        #[max_length = 40]
        jids_hash -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Archived messages.
    messages (id) {
        /// Internal message identifier.
        id -> Uuid,
        /// Owning collection.
        collection_id -> Uuid,
        /// Sender bare JID.
        #[max_length = 512]
        jid -> Varchar,
        /// Text body.
        body -> Text,
        /// Whether the recipient still needs this message replayed.
        renew_needed -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Stanzas queued for offline delivery.
    pending_stanzas (id) {
        /// Internal queue entry identifier.
        id -> Uuid,
        /// Recipient user.
        user_id -> Uuid,
        /// Serialized stanza.
        xml -> Text,
        /// Enqueue timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(contacts -> users (user_id));
diesel::joinable!(contacts_groups -> contacts (contact_id));
diesel::joinable!(contacts_groups -> groups (group_id));
diesel::joinable!(fragments -> users (user_id));
diesel::joinable!(messages -> collections (collection_id));
diesel::joinable!(pending_stanzas -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    contacts,
    groups,
    contacts_groups,
    fragments,
    collections,
    messages,
    pending_stanzas,
);
