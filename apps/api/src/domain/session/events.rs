use uuid::Uuid;

/// Domain events emitted by the Session aggregate
///
/// The request handlers log them; nothing else subscribes yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A planning run was accepted and counted
    QueryRecorded {
        session_id: Uuid,
        /// Count after this query
        query_count: u32,
    },
    /// The session used its last allowed query; submission is now disabled
    LimitReached { session_id: Uuid, limit: u32 },
}
