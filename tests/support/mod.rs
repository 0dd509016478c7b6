// ABOUTME: Test support utilities.
// ABOUTME: Tracing setup, in-process fakes for the cluster and platform, fixture builders.

use std::sync::{Arc, Once};

use arangodeploy::api::{ActionRecord, ArangoDeployment, DeploymentSpec, MemberStatus};
use arangodeploy::config::ExecutorConfig;
use arangodeploy::reconcile::Dependencies;
use arangodeploy::store::MemoryStatusStore;
use arangodeploy::types::{DeploymentMode, ServerGroup};

// Each test binary only uses some of these modules, so allow dead_code.
#[allow(dead_code)]
pub mod fake_cluster;
#[allow(dead_code)]
pub mod fake_platform;

pub use fake_cluster::FakeCluster;
pub use fake_platform::FakePlatform;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("arangodeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A cluster deployment named `db` with three members per database group.
#[allow(dead_code)]
pub fn cluster_deployment() -> ArangoDeployment {
    let mut d = ArangoDeployment::new("db", DeploymentSpec::new(DeploymentMode::Cluster));
    for i in 1..=3 {
        d.status
            .members
            .agents
            .push(MemberStatus::new(format!("AGNT-{i}")));
        d.status
            .members
            .dbservers
            .push(MemberStatus::new(format!("PRMR-{i}")));
        d.status
            .members
            .coordinators
            .push(MemberStatus::new(format!("CRDN-{i}")));
    }
    d
}

#[allow(dead_code)]
pub fn action(
    id: &str,
    action_type: arangodeploy::api::ActionType,
    group: ServerGroup,
    member: &str,
) -> ActionRecord {
    ActionRecord::new(id, action_type, group, member)
}

/// Store, cluster and platform fakes wired into executor dependencies.
#[allow(dead_code)]
pub struct Harness {
    pub store: Arc<MemoryStatusStore>,
    pub cluster: FakeCluster,
    pub platform: FakePlatform,
    pub deps: Dependencies,
}

#[allow(dead_code)]
impl Harness {
    pub fn new(deployment: ArangoDeployment) -> Self {
        let store = Arc::new(MemoryStatusStore::new(deployment));
        let cluster = FakeCluster::default();
        let platform = FakePlatform::default();
        let deps = Dependencies {
            store: store.clone(),
            connections: Arc::new(cluster.clone()),
            pods: Arc::new(platform.clone()),
        };
        Self {
            store,
            cluster,
            platform,
            deps,
        }
    }

    pub fn config() -> ExecutorConfig {
        ExecutorConfig::default()
    }

    /// Plan as currently persisted.
    pub fn stored_plan(&self) -> Vec<ActionRecord> {
        self.store
            .snapshot()
            .map(|d| d.status.plan)
            .unwrap_or_default()
    }

    pub fn stored(&self) -> ArangoDeployment {
        self.store.snapshot().expect("deployment exists")
    }
}
