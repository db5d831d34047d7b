//! Runtime permission flow.
//!
//! A three-state machine: `Checking` waits on one batch permission request,
//! its answer moves to `Granted` or `Denied`, and a retry from `Denied`
//! goes back to `Checking` with a fresh request. The transition function is
//! pure; [`PermissionFlow`] adds the request bookkeeping and
//! [`PermissionPlatform`] is whatever actually asks the OS (or the user).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::future::Future;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Denials after which asking again is pointless and the user should be
/// sent to system settings instead.
pub const SETTINGS_AFTER_DENIALS: u32 = 2;

/// A runtime permission the app uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Internet,
    NetworkState,
    FineLocation,
    CoarseLocation,
}

impl Permission {
    /// Without these nothing loads.
    pub const ESSENTIAL: [Permission; 2] = [Permission::Internet, Permission::NetworkState];

    /// Needed by the map.
    pub const LOCATION: [Permission; 2] = [Permission::FineLocation, Permission::CoarseLocation];

    /// Everything requested at startup.
    pub const REQUIRED: [Permission; 4] = [
        Permission::Internet,
        Permission::NetworkState,
        Permission::FineLocation,
        Permission::CoarseLocation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internet => "internet",
            Self::NetworkState => "network_state",
            Self::FineLocation => "fine_location",
            Self::CoarseLocation => "coarse_location",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "internet" => Ok(Self::Internet),
            "network_state" => Ok(Self::NetworkState),
            "fine_location" => Ok(Self::FineLocation),
            "coarse_location" => Ok(Self::CoarseLocation),
            other => Err(format!("Unknown permission: {}", other)),
        }
    }
}

/// Where the flow stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PermissionState {
    /// A request is outstanding.
    Checking,
    Granted,
    Denied,
}

/// Something that moves the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionEvent {
    /// Answer to a batch request: permission -> granted.
    Answered(BTreeMap<Permission, bool>),

    /// User asked to try again after a denial.
    Retry,
}

impl PermissionEvent {
    /// True when the answer is non-empty and grants everything in it.
    pub fn all_granted(&self) -> bool {
        match self {
            Self::Answered(results) => !results.is_empty() && results.values().all(|granted| *granted),
            Self::Retry => false,
        }
    }
}

/// Next state for an event. Pairs not listed leave the state as it is.
pub fn transition(state: PermissionState, event: &PermissionEvent) -> PermissionState {
    use PermissionState::*;

    match (state, event) {
        (Checking, PermissionEvent::Answered(_)) if event.all_granted() => Granted,
        (Checking, PermissionEvent::Answered(_)) => Denied,
        (Denied, PermissionEvent::Retry) => Checking,
        (state, _) => state,
    }
}

/// How an answer is reduced to granted or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GrantPolicy {
    /// Every requested permission must be granted.
    #[default]
    All,
    /// One granted permission is enough (fine or coarse location).
    Any,
}

/// Request the flow wants sent to the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest(pub Vec<Permission>);

/// One permission flow over a fixed set of permissions.
#[derive(Debug, Clone)]
pub struct PermissionFlow {
    requested: Vec<Permission>,
    policy: GrantPolicy,
    state: PermissionState,
    denials: u32,
}

impl PermissionFlow {
    /// Start from what is already granted.
    ///
    /// If the set is already satisfied the flow is `Granted` right away and
    /// no request is made. Otherwise it is `Checking` and the returned
    /// request must be sent.
    pub fn start(
        requested: &[Permission],
        policy: GrantPolicy,
        is_granted: impl Fn(Permission) -> bool,
    ) -> (Self, Option<PermissionRequest>) {
        let granted: BTreeMap<Permission, bool> =
            requested.iter().map(|p| (*p, is_granted(*p))).collect();

        let mut flow = Self {
            requested: requested.to_vec(),
            policy,
            state: PermissionState::Checking,
            denials: 0,
        };

        if flow.satisfied(&granted) {
            debug!(permissions = ?flow.requested, "Permissions already granted");
            flow.state = PermissionState::Granted;
            return (flow, None);
        }

        let request = flow.request();
        (flow, Some(request))
    }

    pub fn state(&self) -> PermissionState {
        self.state
    }

    pub fn denials(&self) -> u32 {
        self.denials
    }

    /// The user has refused often enough that only system settings can help.
    pub fn should_open_settings(&self) -> bool {
        self.state == PermissionState::Denied && self.denials >= SETTINGS_AFTER_DENIALS
    }

    /// Feed an event. Returns a request when the flow re-enters `Checking`.
    pub fn handle(&mut self, event: PermissionEvent) -> Option<PermissionRequest> {
        // Reduce the raw answer with this flow's policy before transitioning
        let event = match event {
            PermissionEvent::Answered(results) => {
                let granted = self.satisfied(&results);
                PermissionEvent::Answered(
                    self.requested.iter().map(|p| (*p, granted)).collect(),
                )
            }
            other => other,
        };

        let previous = self.state;
        self.state = transition(previous, &event);

        match (previous, self.state) {
            (PermissionState::Checking, PermissionState::Denied) => {
                self.denials += 1;
                warn!(denials = self.denials, "Permissions denied");
                None
            }
            (PermissionState::Checking, PermissionState::Granted) => {
                info!("Permissions granted");
                None
            }
            (PermissionState::Denied, PermissionState::Checking) => Some(self.request()),
            _ => None,
        }
    }

    fn request(&self) -> PermissionRequest {
        PermissionRequest(self.requested.clone())
    }

    /// Missing answers count as refusals.
    fn satisfied(&self, results: &BTreeMap<Permission, bool>) -> bool {
        let granted = |p: &Permission| results.get(p).copied().unwrap_or(false);
        match self.policy {
            GrantPolicy::All => self.requested.iter().all(granted),
            GrantPolicy::Any => self.requested.iter().any(granted),
        }
    }
}

/// Platform side of the flow.
pub trait PermissionPlatform: Send + Sync {
    /// Whether a permission is granted right now.
    fn is_granted(&self, permission: Permission) -> bool;

    /// Ask for a batch of permissions and report the answer per permission.
    fn request(
        &self,
        permissions: &[Permission],
    ) -> impl Future<Output = BTreeMap<Permission, bool>> + Send;
}

/// Run a flow through at most one request.
pub async fn resolve<P: PermissionPlatform>(
    platform: &P,
    requested: &[Permission],
    policy: GrantPolicy,
) -> PermissionFlow {
    let (mut flow, request) = PermissionFlow::start(requested, policy, |p| platform.is_granted(p));

    if let Some(PermissionRequest(permissions)) = request {
        let answer = platform.request(&permissions).await;
        flow.handle(PermissionEvent::Answered(answer));
    }

    flow
}

/// Permissions fixed up front, e.g. from configuration. Requests are
/// answered with the same fixed grants.
#[derive(Debug, Clone, Default)]
pub struct StaticPermissions {
    granted: BTreeSet<Permission>,
}

impl StaticPermissions {
    pub fn new(granted: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            granted: granted.into_iter().collect(),
        }
    }

    /// Network always available; location only when allowed.
    pub fn desktop(allow_location: bool) -> Self {
        let mut permissions = Self::new(Permission::ESSENTIAL);
        if allow_location {
            permissions.granted.extend(Permission::LOCATION);
        }
        permissions
    }
}

impl PermissionPlatform for StaticPermissions {
    fn is_granted(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }

    async fn request(&self, permissions: &[Permission]) -> BTreeMap<Permission, bool> {
        permissions
            .iter()
            .map(|p| (*p, self.granted.contains(p)))
            .collect()
    }
}
