//! Row structs mirroring the relational schema.
//!
//! Timestamps are RFC 3339 text; list-valued columns (`target_users`,
//! `features`, …) are stored as JSON text and parsed at the gateway.

/// Row in the `users` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserRow {
    /// User id (`usr_…`).
    pub id: String,
    /// First name (exact-match key, case-sensitive).
    pub first_name: String,
    /// Last name (exact-match key, case-sensitive).
    pub last_name: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Row in the `design_sessions` table.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionRow {
    /// Session id (`sess_…`).
    pub id: String,
    /// Owning user id.
    pub user_id: String,
    /// The captured design challenge (natural-key component).
    pub design_challenge: String,
    /// JSON array of target users.
    pub target_users: String,
    /// JSON array of emotional goals.
    pub emotional_goals: String,
    /// The refined problem statement, if set.
    pub problem_statement: Option<String>,
    /// The proposed solution, if set.
    pub proposed_solution: Option<String>,
    /// Workflow status text.
    pub status: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Row in the `design_iterations` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IterationRow {
    /// Iteration id (`iter_…`).
    pub id: String,
    /// Owning session id.
    pub session_id: String,
    /// Problem statement at iteration time.
    pub problem_statement: String,
    /// Solution text.
    pub solution: String,
    /// JSON array of key features.
    pub features: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Row in the `feedback_history` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackRow {
    /// Feedback id (`fb_…`).
    pub id: String,
    /// Owning session id.
    pub session_id: String,
    /// JSON feedback payload.
    pub feedback_data: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// Row in the `clarity_capsules` table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapsuleRow {
    /// Capsule id (`cap_…`).
    pub id: String,
    /// Owning session id (unique — one capsule per session).
    pub session_id: String,
    /// Final problem statement.
    pub problem_statement: String,
    /// Final solution concept.
    pub solution_concept: String,
    /// JSON array of strengths.
    pub strengths: String,
    /// JSON array of blind spots.
    pub blind_spots: String,
    /// JSON array of next steps.
    pub next_steps: String,
    /// Creation timestamp.
    pub created_at: String,
}
