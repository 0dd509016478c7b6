// ABOUTME: Verification error types with SNAFU pattern.
// ABOUTME: Distinguishes poll timeouts, no-leader outcomes and convergence violations.

use snafu::Snafu;

use crate::client::ClientError;
use crate::platform::PlatformError;
use crate::retry::RetryError;
use crate::store::StoreError;
use crate::types::MemberId;

/// Why a single poll attempt did not succeed.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum CheckError {
    #[snafu(display("{source}"))]
    Client { source: ClientError },

    #[snafu(display("{source}"))]
    Store { source: StoreError },

    #[snafu(display("{source}"))]
    Platform { source: PlatformError },

    /// The observed state does not match the expectation yet.
    #[snafu(display("{message}"))]
    Mismatch { message: String },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum WaitError {
    #[snafu(display("timed out waiting for {what}: {source}"))]
    Timeout {
        what: String,
        source: RetryError<CheckError>,
    },

    /// The server answered, but reported that no leader is elected.
    #[snafu(display("server responds without a leader: {source}"))]
    NoLeader { source: ClientError },

    #[snafu(display("server is up but {source}"))]
    Predicate { source: CheckError },
}

impl WaitError {
    pub fn is_no_leader(&self) -> bool {
        matches!(self, WaitError::NoLeader { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout { .. })
    }
}

/// A deployment did not reach the healthy shape its mode requires.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ConvergenceError {
    #[snafu(display("cluster not running in expected health in time: {source}"))]
    ClusterHealth { source: WaitError },

    #[snafu(display("single server not running in time: {source}"))]
    SingleServer { source: WaitError },

    #[snafu(display("wrong number of servers: single {singles} - agents {agents}"))]
    MemberCount { singles: usize, agents: usize },

    #[snafu(display("unable to create connection to {member}: {source}"))]
    Connect { member: MemberId, source: ClientError },

    #[snafu(display("version check failed for {member}: {source}"))]
    MemberVersion { member: MemberId, source: WaitError },

    #[snafu(display("wrong number of results: good {good} - noleader {no_leader}"))]
    LeaderResults { good: usize, no_leader: usize },

    #[snafu(display("deployment mode {mode} is not supported"))]
    UnsupportedMode { mode: String },
}

/// Failure of a one-shot resource operation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ResourceError {
    #[snafu(display("store operation failed: {source}"))]
    StoreAccess { source: StoreError },

    #[snafu(display("platform operation failed: {source}"))]
    PlatformAccess { source: PlatformError },

    #[snafu(display("update still conflicting after {attempts} attempts"))]
    ConflictsExhausted { attempts: u32 },
}
