//! Device add/remove hooks.
//!
//! The host runs a hook once per attach or detach, passing the device payload
//! as the only argument, and reads the exit status:
//!
//! - `on_device_add`: 0 takes ownership of the device, anything else declines
//! - `on_device_remove`: status is informational only
//!
//! Both hooks append their argv to the [`InvocationLog`] before doing anything
//! else, whatever the outcome.
//!
//! # Example
//!
//! ```no_run
//! use devhook::config::Config;
//! use devhook::hooks::HookContext;
//!
//! let config = Config::load().unwrap();
//! let ctx = HookContext::from_config(&config).unwrap();
//! let payload = r#"{"idVendor":"2341","idProduct":"0043","serial":"ABC123",
//!     "urDeviceType":"SERIAL",
//!     "logicalDevices":[{"deviceNode":"/dev/ttyACM0","major":166,"minor":0}]}"#;
//! let outcome = ctx.on_device_add(&["on_device_add", payload], payload);
//! std::process::exit(outcome.exit_code());
//! ```

pub mod policy;

pub use crate::audit::HookKind;
pub use policy::{AcceptAll, AcceptancePolicy, CategoryPolicy, Verdict};

use tracing::warn;

use crate::audit::{log_hook_decision, Decision};
use crate::config::Config;
use crate::devices::{parse_descriptor, DeviceIdentity};
use crate::error::Result;
use crate::invocation::InvocationLog;
use crate::ledger::{AddOutcome, LedgerStore, RemoveOutcome};
use crate::utils::logging::init_logging;

/// Exit status for success.
pub const EXIT_OK: i32 = 0;
/// Exit status for rejection or failure.
pub const EXIT_REJECT: i32 = 1;

/// What a hook invocation ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
    /// Device added to the ledger.
    Accepted(DeviceIdentity),
    /// Device removed from the ledger.
    Removed(DeviceIdentity),
    /// Acceptance policy declined the device.
    Rejected(String),
    /// Payload was not JSON, failed the schema, or had a bad category.
    Invalid(String),
    /// Add for a device that is already owned.
    AlreadyOwned(DeviceIdentity),
    /// Remove for a device that is not owned.
    NotOwned(DeviceIdentity),
    /// Ledger could not be written.
    Failed(String),
}

impl HookOutcome {
    pub fn decision(&self) -> Decision {
        match self {
            HookOutcome::Accepted(_) => Decision::Accepted,
            HookOutcome::Removed(_) => Decision::Released,
            HookOutcome::Rejected(_) => Decision::Rejected,
            HookOutcome::Invalid(_) => Decision::Invalid,
            HookOutcome::AlreadyOwned(_) | HookOutcome::NotOwned(_) => Decision::Conflict,
            HookOutcome::Failed(_) => Decision::Failed,
        }
    }

    pub fn is_success(&self) -> bool {
        self.decision().is_success()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            EXIT_OK
        } else {
            EXIT_REJECT
        }
    }

    fn identity(&self) -> Option<&DeviceIdentity> {
        match self {
            HookOutcome::Accepted(id)
            | HookOutcome::Removed(id)
            | HookOutcome::AlreadyOwned(id)
            | HookOutcome::NotOwned(id) => Some(id),
            _ => None,
        }
    }
}

impl std::fmt::Display for HookOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookOutcome::Accepted(id) => write!(f, "device {} accepted", id),
            HookOutcome::Removed(id) => write!(f, "device {} removed", id),
            HookOutcome::Rejected(reason) => write!(f, "device rejected: {}", reason),
            HookOutcome::Invalid(reason) => write!(f, "invalid payload: {}", reason),
            HookOutcome::AlreadyOwned(id) => {
                write!(f, "duplicate add for device {} (already owned)", id)
            }
            HookOutcome::NotOwned(id) => {
                write!(f, "device {} should be removed, but was not owned", id)
            }
            HookOutcome::Failed(reason) => write!(f, "ledger update failed: {}", reason),
        }
    }
}

/// Everything a hook needs: ledger, invocation log and acceptance policy.
pub struct HookContext {
    store: LedgerStore,
    invocations: InvocationLog,
    policy: Box<dyn AcceptancePolicy>,
}

impl HookContext {
    pub fn new(
        store: LedgerStore,
        invocations: InvocationLog,
        policy: impl AcceptancePolicy + 'static,
    ) -> Self {
        Self {
            store,
            invocations,
            policy: Box::new(policy),
        }
    }

    /// Context with the ledger, log and [`CategoryPolicy`] described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            LedgerStore::from_config(config)?,
            InvocationLog::from_config(config),
            CategoryPolicy::from_config(&config.acceptance)?,
        ))
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn invocations(&self) -> &InvocationLog {
        &self.invocations
    }

    /// Run the add-hook for `payload`. `argv` is what gets logged.
    pub fn on_device_add<S: AsRef<str>>(&self, argv: &[S], payload: &str) -> HookOutcome {
        self.log_invocation(argv);
        let outcome = self.add(payload);
        self.audit(HookKind::Add, &outcome, payload);
        outcome
    }

    /// Run the remove-hook for `payload`. `argv` is what gets logged.
    pub fn on_device_remove<S: AsRef<str>>(&self, argv: &[S], payload: &str) -> HookOutcome {
        self.log_invocation(argv);
        let outcome = self.remove(payload);
        self.audit(HookKind::Remove, &outcome, payload);
        outcome
    }

    /// Run whichever hook `hook` names.
    pub fn run<S: AsRef<str>>(&self, hook: HookKind, argv: &[S], payload: &str) -> HookOutcome {
        match hook {
            HookKind::Add => self.on_device_add(argv, payload),
            HookKind::Remove => self.on_device_remove(argv, payload),
        }
    }

    fn add(&self, payload: &str) -> HookOutcome {
        let device = match parse_descriptor(payload) {
            Ok(d) => d,
            Err(e) if e.is_rejection() => return HookOutcome::Invalid(e.to_string()),
            Err(e) => return HookOutcome::Failed(e.to_string()),
        };

        if let Verdict::Reject(reason) = self.policy.evaluate(&device) {
            return HookOutcome::Rejected(reason);
        }

        match self.store.add(&device) {
            Ok(AddOutcome::Added(id)) => HookOutcome::Accepted(id),
            Ok(AddOutcome::AlreadyOwned(id)) => HookOutcome::AlreadyOwned(id),
            Err(e) => HookOutcome::Failed(e.to_string()),
        }
    }

    fn remove(&self, payload: &str) -> HookOutcome {
        let device = match parse_descriptor(payload) {
            Ok(d) => d,
            Err(e) if e.is_rejection() => return HookOutcome::Invalid(e.to_string()),
            Err(e) => return HookOutcome::Failed(e.to_string()),
        };

        match self.store.remove(&device) {
            Ok(RemoveOutcome::Removed(id)) => HookOutcome::Removed(id),
            Ok(RemoveOutcome::NotOwned(id)) => HookOutcome::NotOwned(id),
            Err(e) => HookOutcome::Failed(e.to_string()),
        }
    }

    fn log_invocation<S: AsRef<str>>(&self, argv: &[S]) {
        record_invocation(&self.invocations, argv);
    }

    fn audit(&self, hook: HookKind, outcome: &HookOutcome, payload: &str) {
        let category = serde_json::from_str::<serde_json::Value>(payload)
            .ok()
            .and_then(|v| {
                v.get("urDeviceType")
                    .and_then(|c| c.as_str())
                    .map(str::to_lowercase)
            });
        log_hook_decision(
            hook,
            outcome.decision(),
            category.as_deref(),
            outcome.identity().map(DeviceIdentity::as_str),
            &outcome.to_string(),
        );
    }
}

fn record_invocation<S: AsRef<str>>(log: &InvocationLog, argv: &[S]) {
    if let Err(e) = log.record(argv) {
        warn!(error = %e, "could not append to invocation log");
    }
}

/// Load config, initialize logging and run one hook for this process.
///
/// The process argv is what gets written to the invocation log. It is
/// written even when the config cannot be loaded; the log then goes to the
/// state directory given by defaults and `DEVHOOK_*` overrides.
pub fn run_hook(hook: HookKind, payload: &str) -> Result<HookOutcome> {
    let argv: Vec<String> = std::env::args().collect();
    run_hook_with(hook, &argv, payload, Config::load())
}

fn run_hook_with<S: AsRef<str>>(
    hook: HookKind,
    argv: &[S],
    payload: &str,
    config: Result<Config>,
) -> Result<HookOutcome> {
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            let fallback = Config::from_env();
            init_logging(&fallback.logging);
            record_invocation(&InvocationLog::from_config(&fallback), argv);
            log_hook_decision(hook, Decision::Failed, None, None, &e.to_string());
            return Err(e);
        }
    };
    init_logging(&config.logging);

    let ctx = match HookContext::from_config(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            record_invocation(&InvocationLog::from_config(&config), argv);
            log_hook_decision(hook, Decision::Failed, None, None, &e.to_string());
            return Err(e);
        }
    };
    Ok(ctx.run(hook, argv, payload))
}
