//! Endpoint registry
//!
//! Every remote operation the client can issue is named by an [`Operation`].
//! The mapping to method, route template and envelope depth is an exhaustive
//! `match`, so adding an operation without a route does not compile.

use reqwest::Method;
use std::fmt;

/// Backend domain an endpoint belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    User,
    Branch,
    ClassSession,
    Attendance,
    Registration,
    Scores,
    Feature,
    Upload,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Domain::User => "users",
            Domain::Branch => "branches",
            Domain::ClassSession => "class-sessions",
            Domain::Attendance => "attendance",
            Domain::Registration => "registrations",
            Domain::Scores => "scores",
            Domain::Feature => "features",
            Domain::Upload => "uploads",
        };
        f.write_str(label)
    }
}

/// How many `data` wrappers the backend puts around the payload.
///
/// `Single` is `{ "data": T }`, `Double` is `{ "data": { "data": T } }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeDepth {
    Single,
    Double,
}

impl EnvelopeDepth {
    pub fn levels(self) -> usize {
        match self {
            EnvelopeDepth::Single => 1,
            EnvelopeDepth::Double => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CurrentUser,
    UserById,
    ListBranches,
    BranchById,
    ListClassSessions,
    ClassSessionById,
    ListAttendance,
    RecordAttendance,
    ListRegistrations,
    CreateRegistration,
    ListScores,
    ListFeatures,
    CreateSignedUploadUrl,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub method: Method,
    pub path: &'static str,
    pub domain: Domain,
    pub depth: EnvelopeDepth,
}

impl Operation {
    pub const ALL: [Operation; 13] = [
        Operation::CurrentUser,
        Operation::UserById,
        Operation::ListBranches,
        Operation::BranchById,
        Operation::ListClassSessions,
        Operation::ClassSessionById,
        Operation::ListAttendance,
        Operation::RecordAttendance,
        Operation::ListRegistrations,
        Operation::CreateRegistration,
        Operation::ListScores,
        Operation::ListFeatures,
        Operation::CreateSignedUploadUrl,
    ];

    pub fn descriptor(self) -> EndpointDescriptor {
        use EnvelopeDepth::{Double, Single};

        let (method, path, domain, depth) = match self {
            Operation::CurrentUser => (Method::GET, "/users/me", Domain::User, Single),
            Operation::UserById => (Method::GET, "/users/{id}", Domain::User, Single),
            Operation::ListBranches => (Method::GET, "/branches", Domain::Branch, Double),
            Operation::BranchById => (Method::GET, "/branches/{id}", Domain::Branch, Single),
            Operation::ListClassSessions => {
                (Method::GET, "/class-sessions", Domain::ClassSession, Double)
            }
            Operation::ClassSessionById => {
                (Method::GET, "/class-sessions/{id}", Domain::ClassSession, Single)
            }
            Operation::ListAttendance => (
                Method::GET,
                "/class-sessions/{id}/attendances",
                Domain::Attendance,
                Double,
            ),
            Operation::RecordAttendance => {
                (Method::POST, "/attendances", Domain::Attendance, Single)
            }
            Operation::ListRegistrations => {
                (Method::GET, "/registrations", Domain::Registration, Double)
            }
            Operation::CreateRegistration => {
                (Method::POST, "/registrations", Domain::Registration, Single)
            }
            Operation::ListScores => (Method::GET, "/scores", Domain::Scores, Double),
            Operation::ListFeatures => (Method::GET, "/features", Domain::Feature, Single),
            Operation::CreateSignedUploadUrl => {
                (Method::POST, "/upload/signed-url", Domain::Upload, Single)
            }
        };

        EndpointDescriptor {
            method,
            path,
            domain,
            depth,
        }
    }

    /// GET-shaped operations can be repeated without side effects
    pub fn is_idempotent(self) -> bool {
        self.descriptor().method == Method::GET
    }

    pub fn name(self) -> &'static str {
        match self {
            Operation::CurrentUser => "get current user",
            Operation::UserById => "get user",
            Operation::ListBranches => "list branches",
            Operation::BranchById => "get branch",
            Operation::ListClassSessions => "list class sessions",
            Operation::ClassSessionById => "get class session",
            Operation::ListAttendance => "list attendance",
            Operation::RecordAttendance => "record attendance",
            Operation::ListRegistrations => "list registrations",
            Operation::CreateRegistration => "create registration",
            Operation::ListScores => "list scores",
            Operation::ListFeatures => "list features",
            Operation::CreateSignedUploadUrl => "create signed upload url",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl EndpointDescriptor {
    /// Substitute `{name}` placeholders in the route template.
    ///
    /// Placeholders without a matching parameter are left as-is; callers own
    /// supplying every identifier the template names.
    pub fn render(&self, params: &[(&str, &str)]) -> String {
        params
            .iter()
            .fold(self.path.to_string(), |path, (name, value)| {
                path.replace(&format!("{{{}}}", name), value)
            })
    }

    pub fn placeholders(&self) -> Vec<&'static str> {
        self.path
            .split('/')
            .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
            .collect()
    }
}
