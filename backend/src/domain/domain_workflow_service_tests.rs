//! Tests for the custom-domain workflow orchestrator.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    DomainConfig, DomainRegistrar, DomainRegistrarError, MockDomainRegistrar, MockNameserverResolver,
    MockProjectRepository, ProjectRepositoryError, RegisteredDomain, VerificationSleeper,
};
use crate::domain::{
    DomainAttachment, ProjectName, ProviderNameservers, Subdomain, VerificationPollConfig,
};
use crate::outbound::persistence::InMemoryProjectRepository;

const PROVIDER_NS: [&str; 2] = ["ns1.vercel-dns.com", "ns2.vercel-dns.com"];

/// Keeps scheduled polls parked so they never touch the mocks.
struct ParkedSleeper;

#[async_trait]
impl VerificationSleeper for ParkedSleeper {
    async fn sleep(&self, _duration: Duration) {
        std::future::pending::<()>().await;
    }
}

fn name(raw: &str) -> DomainName {
    DomainName::from_trusted(raw).expect("valid domain")
}

fn project(domain: Option<(&str, DomainStatus)>) -> Project {
    let project_name = ProjectName::new("Storefront").expect("valid name");
    let subdomain = Subdomain::derive(&project_name).expect("derivable");
    let mut project = Project::new(project_name, subdomain, Utc::now());
    project.custom_domain = domain.map(|(raw, status)| DomainAttachment {
        domain: name(raw),
        status,
    });
    project
}

fn with_domain(project: &Project, domain: Option<(&str, DomainStatus)>) -> Project {
    let mut updated = project.clone();
    updated.custom_domain = domain.map(|(raw, status)| DomainAttachment {
        domain: name(raw),
        status,
    });
    updated
}

fn registered(raw: &str, verified: bool) -> RegisteredDomain {
    RegisteredDomain {
        name: raw.to_owned(),
        apex_name: raw.to_owned(),
        verified,
        verification: Vec::new(),
    }
}

fn resolver_answering(answer: &'static [&'static str]) -> MockNameserverResolver {
    let mut resolver = MockNameserverResolver::new();
    resolver
        .expect_nameservers()
        .returning(move |_| Ok(answer.iter().map(|ns| (*ns).to_owned()).collect()));
    resolver
}

/// Wakes every poll attempt after a short real delay.
struct BriefSleeper;

#[async_trait]
impl VerificationSleeper for BriefSleeper {
    async fn sleep(&self, _duration: Duration) {
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

/// Registrar whose availability lookup takes a while, recording every add.
#[derive(Default)]
struct SlowLookupRegistrar {
    added: Mutex<Vec<String>>,
}

#[async_trait]
impl DomainRegistrar for SlowLookupRegistrar {
    async fn add_domain(&self, name: &DomainName) -> Result<RegisteredDomain, DomainRegistrarError> {
        self.added
            .lock()
            .expect("registrar lock")
            .push(name.to_string());
        Ok(registered(name.as_str(), false))
    }

    async fn get_domain(&self, _name: &DomainName) -> Result<RegisteredDomain, DomainRegistrarError> {
        tokio::time::sleep(Duration::from_millis(50)).await;
        Err(DomainRegistrarError::not_found(404_u16))
    }

    async fn verify_domain(
        &self,
        name: &DomainName,
    ) -> Result<RegisteredDomain, DomainRegistrarError> {
        Ok(registered(name.as_str(), false))
    }

    async fn remove_domain(&self, _name: &DomainName) -> Result<(), DomainRegistrarError> {
        Ok(())
    }

    async fn list_domains(&self) -> Result<Vec<RegisteredDomain>, DomainRegistrarError> {
        Ok(Vec::new())
    }

    async fn domain_config(&self, _name: &DomainName) -> Result<DomainConfig, DomainRegistrarError> {
        Ok(DomainConfig::default())
    }
}

fn service(
    repo: MockProjectRepository,
    registrar: MockDomainRegistrar,
    resolver: MockNameserverResolver,
) -> DomainWorkflowService {
    service_with(
        Arc::new(repo),
        Arc::new(registrar),
        resolver,
        Arc::new(ParkedSleeper),
    )
}

fn service_with(
    repository: Arc<dyn ProjectRepository>,
    registrar: Arc<dyn DomainRegistrar>,
    resolver: MockNameserverResolver,
    sleeper: Arc<dyn VerificationSleeper>,
) -> DomainWorkflowService {
    let registrar = RegistrarService::new(
        registrar,
        Arc::new(resolver),
        ProviderNameservers::new(PROVIDER_NS),
    );
    let poller = VerificationPoller::new(
        Arc::clone(&repository),
        registrar.clone(),
        sleeper,
        VerificationPollConfig::default(),
    );
    DomainWorkflowService::new(
        repository,
        registrar,
        Arc::new(DomainValidator::new("myapp.dev", Vec::<String>::new())),
        poller,
    )
}

fn repo_finding(project: &Project) -> MockProjectRepository {
    let mut repo = MockProjectRepository::new();
    let snapshot = project.clone();
    repo.expect_find_by_id()
        .with(eq(project.id))
        .returning(move |_| Ok(Some(snapshot.clone())));
    repo
}

fn attach_request(project: &Project, domain: &str) -> AttachDomainRequest {
    AttachDomainRequest {
        project_id: project.id,
        domain: domain.to_owned(),
    }
}

fn domain_request(project: &Project, domain: &str) -> ProjectDomainRequest {
    ProjectDomainRequest {
        project_id: project.id,
        domain: domain.to_owned(),
    }
}

/// Repository and registrar primed for an attach that reaches the claim.
fn attach_ready(current: &Project) -> (MockProjectRepository, MockDomainRegistrar) {
    let mut repo = repo_finding(current);
    repo.expect_find_by_custom_domain().returning(|_| Ok(None));
    let mut registrar = MockDomainRegistrar::new();
    registrar
        .expect_get_domain()
        .returning(|_| Err(DomainRegistrarError::not_found(404_u16)));
    (repo, registrar)
}

#[tokio::test]
async fn attach_records_added_domain() {
    let current = project(None);
    let pending = with_domain(&current, Some(("example.com", DomainStatus::Pending)));
    let added = with_domain(&current, Some(("example.com", DomainStatus::Added)));
    let (mut repo, mut registrar) = attach_ready(&current);
    repo.expect_attach_domain()
        .withf(|_, domain, status| domain.as_str() == "example.com" && *status == DomainStatus::Pending)
        .times(1)
        .return_once(move |_, _, _| Ok(pending));
    repo.expect_update_status()
        .with(eq(current.id), eq(DomainStatus::Added))
        .times(1)
        .return_once(move |_, _| Ok(added));
    registrar
        .expect_add_domain()
        .times(1)
        .returning(|domain| Ok(registered(domain.as_str(), false)));

    let outcome = service(repo, registrar, MockNameserverResolver::new())
        .attach(attach_request(&current, " Example.com "))
        .await
        .expect("attach succeeds");

    assert_eq!(outcome.project.domain(), Some(&name("example.com")));
    assert_eq!(outcome.project.domain_status(), Some(DomainStatus::Added));
    assert_eq!(outcome.registered.name, "example.com");
}

#[rstest]
#[case("")]
#[case("not a domain")]
#[case("myapp.dev")]
#[tokio::test]
async fn attach_rejects_invalid_domains_before_any_io(#[case] raw: &str) {
    let current = project(None);

    let err = service(
        MockProjectRepository::new(),
        MockDomainRegistrar::new(),
        MockNameserverResolver::new(),
    )
    .attach(attach_request(&current, raw))
    .await
    .expect_err("invalid domain");

    assert_eq!(err.code(), ErrorCode::InvalidDomain);
}

#[tokio::test]
async fn attach_rejects_unknown_project() {
    let mut repo = MockProjectRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let err = service(repo, MockDomainRegistrar::new(), MockNameserverResolver::new())
        .attach(AttachDomainRequest {
            project_id: ProjectId::random(),
            domain: "example.com".to_owned(),
        })
        .await
        .expect_err("unknown project");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn attach_rejects_domain_held_by_another_project() {
    let current = project(None);
    let holder = project(Some(("example.com", DomainStatus::Verified)));
    let mut repo = repo_finding(&current);
    repo.expect_find_by_custom_domain()
        .return_once(move |_| Ok(Some(holder)));
    let mut registrar = MockDomainRegistrar::new();
    registrar.expect_get_domain().never();
    registrar.expect_add_domain().never();

    let err = service(repo, registrar, MockNameserverResolver::new())
        .attach(attach_request(&current, "example.com"))
        .await
        .expect_err("domain in use");

    assert_eq!(err.code(), ErrorCode::DomainInUse);
}

#[tokio::test]
async fn attaching_the_same_domain_twice_is_rejected() {
    let current = project(Some(("example.com", DomainStatus::Added)));
    let snapshot = current.clone();
    let mut repo = repo_finding(&current);
    repo.expect_find_by_custom_domain()
        .return_once(move |_| Ok(Some(snapshot)));

    let err = service(repo, MockDomainRegistrar::new(), MockNameserverResolver::new())
        .attach(attach_request(&current, "example.com"))
        .await
        .expect_err("second attach fails");

    assert_eq!(err.code(), ErrorCode::DomainInUse);
}

#[tokio::test]
async fn attach_rejects_project_holding_another_domain() {
    let current = project(Some(("other.com", DomainStatus::Verified)));
    let mut repo = repo_finding(&current);
    repo.expect_find_by_custom_domain().returning(|_| Ok(None));
    repo.expect_attach_domain().never();

    let err = service(repo, MockDomainRegistrar::new(), MockNameserverResolver::new())
        .attach(attach_request(&current, "example.com"))
        .await
        .expect_err("already attached");

    assert_eq!(err.code(), ErrorCode::DomainAlreadyAttached);
}

#[tokio::test]
async fn attach_rejects_domain_known_to_registrar() {
    let current = project(None);
    let mut repo = repo_finding(&current);
    repo.expect_find_by_custom_domain().returning(|_| Ok(None));
    repo.expect_attach_domain().never();
    let mut registrar = MockDomainRegistrar::new();
    registrar
        .expect_get_domain()
        .returning(|domain| Ok(registered(domain.as_str(), true)));
    registrar.expect_add_domain().never();

    let err = service(repo, registrar, MockNameserverResolver::new())
        .attach(attach_request(&current, "example.com"))
        .await
        .expect_err("not available");

    assert_eq!(err.code(), ErrorCode::DomainNotAvailable);
}

#[tokio::test]
async fn attach_treats_claim_conflict_as_domain_in_use() {
    let current = project(None);
    let (mut repo, mut registrar) = attach_ready(&current);
    repo.expect_attach_domain()
        .returning(|_, domain, _| Err(ProjectRepositoryError::custom_domain_taken(domain.as_str())));
    registrar.expect_add_domain().never();

    let err = service(repo, registrar, MockNameserverResolver::new())
        .attach(attach_request(&current, "example.com"))
        .await
        .expect_err("lost the race");

    assert_eq!(err.code(), ErrorCode::DomainInUse);
}

#[tokio::test]
async fn attach_reports_claim_on_occupied_project() {
    let current = project(None);
    let (mut repo, mut registrar) = attach_ready(&current);
    repo.expect_attach_domain()
        .returning(|id, _, _| Err(ProjectRepositoryError::domain_already_attached(id.to_string())));
    registrar.expect_add_domain().never();

    let err = service(repo, registrar, MockNameserverResolver::new())
        .attach(attach_request(&current, "example.com"))
        .await
        .expect_err("project claimed meanwhile");

    assert_eq!(err.code(), ErrorCode::DomainAlreadyAttached);
}

#[tokio::test]
async fn concurrent_attaches_to_one_project_claim_exactly_one_domain() {
    let repository = Arc::new(InMemoryProjectRepository::new());
    let current = project(None);
    repository.create(&current).await.expect("create project");
    let registrar = Arc::new(SlowLookupRegistrar::default());
    let svc = service_with(
        repository.clone(),
        registrar.clone(),
        MockNameserverResolver::new(),
        Arc::new(ParkedSleeper),
    );

    let (alpha, beta) = tokio::join!(
        svc.attach(attach_request(&current, "alpha.com")),
        svc.attach(attach_request(&current, "beta.com")),
    );

    let (winner, loser) = match (alpha, beta) {
        (Ok(winner), Err(loser)) | (Err(loser), Ok(winner)) => (winner, loser),
        other => panic!("expected exactly one attach to succeed, got {other:?}"),
    };
    assert_eq!(loser.code(), ErrorCode::DomainAlreadyAttached);
    let stored = repository
        .find_by_id(&current.id)
        .await
        .expect("lookup")
        .expect("project exists");
    assert_eq!(stored.domain(), winner.project.domain());
    assert_eq!(stored.domain_status(), Some(DomainStatus::Added));
    let added = registrar.added.lock().expect("registrar lock").clone();
    assert_eq!(added, vec![winner.registered.name]);
}

#[tokio::test]
async fn attach_marks_failed_when_registrar_rejects_add() {
    let current = project(None);
    let pending = with_domain(&current, Some(("example.com", DomainStatus::Pending)));
    let failed = with_domain(&current, Some(("example.com", DomainStatus::Failed)));
    let (mut repo, mut registrar) = attach_ready(&current);
    repo.expect_attach_domain()
        .return_once(move |_, _, _| Ok(pending));
    repo.expect_update_status()
        .with(eq(current.id), eq(DomainStatus::Failed))
        .times(1)
        .return_once(move |_, _| Ok(failed));
    registrar
        .expect_add_domain()
        .returning(|_| Err(DomainRegistrarError::upstream(403_u16, "Not authorized to add domain")));
    registrar.expect_remove_domain().never();

    let err = service(repo, registrar, MockNameserverResolver::new())
        .attach(attach_request(&current, "example.com"))
        .await
        .expect_err("registrar failure");

    assert_eq!(err.code(), ErrorCode::RegistrarError);
    assert_eq!(err.message(), "Not authorized to add domain");
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn attach_rolls_back_when_local_write_fails(#[case] compensation_succeeds: bool) {
    let current = project(None);
    let pending = with_domain(&current, Some(("example.com", DomainStatus::Pending)));
    let (mut repo, mut registrar) = attach_ready(&current);
    repo.expect_attach_domain()
        .return_once(move |_, _, _| Ok(pending));
    repo.expect_update_status()
        .with(eq(current.id), eq(DomainStatus::Added))
        .returning(|_, _| Err(ProjectRepositoryError::connection("pool closed")));
    let cleared = current.clone();
    repo.expect_clear_domain().times(1).return_once(move |_| {
        if compensation_succeeds {
            Ok(cleared)
        } else {
            Err(ProjectRepositoryError::connection("pool closed"))
        }
    });
    registrar
        .expect_add_domain()
        .returning(|domain| Ok(registered(domain.as_str(), false)));
    registrar
        .expect_remove_domain()
        .with(eq(name("example.com")))
        .times(1)
        .returning(move |_| {
            if compensation_succeeds {
                Ok(())
            } else {
                Err(DomainRegistrarError::transport("connection reset"))
            }
        });

    let err = service(repo, registrar, MockNameserverResolver::new())
        .attach(attach_request(&current, "example.com"))
        .await
        .expect_err("local write failed");

    assert_eq!(err.code(), ErrorCode::PersistenceError);
}

#[rstest]
#[case(DomainStatus::Pending, ErrorCode::DomainPending)]
#[case(DomainStatus::Verified, ErrorCode::DomainAlreadyVerified)]
#[case(DomainStatus::Failed, ErrorCode::DomainFailed)]
#[tokio::test]
async fn verify_outside_added_never_calls_registrar(
    #[case] status: DomainStatus,
    #[case] expected: ErrorCode,
) {
    let current = project(Some(("example.com", status)));
    let mut repo = repo_finding(&current);
    repo.expect_update_status().never();
    let mut registrar = MockDomainRegistrar::new();
    registrar.expect_verify_domain().never();
    registrar.expect_get_domain().never();

    let err = service(repo, registrar, MockNameserverResolver::new())
        .verify(domain_request(&current, "example.com"))
        .await
        .expect_err("status gate rejects");

    assert_eq!(err.code(), expected);
}

#[tokio::test]
async fn verify_pending_says_retry_later() {
    let current = project(Some(("example.com", DomainStatus::Pending)));

    let err = service(
        repo_finding(&current),
        MockDomainRegistrar::new(),
        MockNameserverResolver::new(),
    )
    .verify(domain_request(&current, "example.com"))
    .await
    .expect_err("pending");

    assert!(err.message().contains("still being added"));
}

#[tokio::test]
async fn verify_requires_a_custom_domain() {
    let current = project(None);

    let err = service(
        repo_finding(&current),
        MockDomainRegistrar::new(),
        MockNameserverResolver::new(),
    )
    .verify(domain_request(&current, "example.com"))
    .await
    .expect_err("no domain");

    assert_eq!(err.code(), ErrorCode::NoCustomDomain);
}

#[tokio::test]
async fn verify_requires_the_matching_domain() {
    let current = project(Some(("other.com", DomainStatus::Added)));

    let err = service(
        repo_finding(&current),
        MockDomainRegistrar::new(),
        MockNameserverResolver::new(),
    )
    .verify(domain_request(&current, "example.com"))
    .await
    .expect_err("mismatch");

    assert_eq!(err.code(), ErrorCode::DomainMismatch);
}

fn verifying_registrar(provider_verified: bool) -> MockDomainRegistrar {
    let mut registrar = MockDomainRegistrar::new();
    registrar
        .expect_verify_domain()
        .times(1)
        .returning(move |domain| Ok(registered(domain.as_str(), provider_verified)));
    registrar
        .expect_get_domain()
        .returning(move |domain| Ok(registered(domain.as_str(), provider_verified)));
    registrar
        .expect_domain_config()
        .returning(|_| Ok(DomainConfig::default()));
    registrar
}

#[tokio::test]
async fn verify_promotes_when_provider_and_dns_agree() {
    let current = project(Some(("example.com", DomainStatus::Added)));
    let verified = with_domain(&current, Some(("example.com", DomainStatus::Verified)));
    let mut repo = repo_finding(&current);
    repo.expect_update_status()
        .with(eq(current.id), eq(DomainStatus::Verified))
        .times(1)
        .return_once(move |_, _| Ok(verified));

    let outcome = service(repo, verifying_registrar(true), resolver_answering(&PROVIDER_NS))
        .verify(domain_request(&current, "example.com"))
        .await
        .expect("verify succeeds");

    assert_eq!(outcome.status, DomainStatus::Verified);
    assert_eq!(outcome.message, "Domain verified");
    assert!(!outcome.polling_scheduled);
}

#[tokio::test]
async fn verify_keeps_added_when_dns_points_elsewhere() {
    let current = project(Some(("example.com", DomainStatus::Added)));
    let mut repo = repo_finding(&current);
    repo.expect_update_status().never();

    let outcome = service(repo, verifying_registrar(true), resolver_answering(&["ns1.other.com"]))
        .verify(domain_request(&current, "example.com"))
        .await
        .expect("verify succeeds");

    assert_eq!(outcome.status, DomainStatus::Added);
    assert!(outcome.verification.verified);
    assert!(!outcome.verification.using_provider_dns);
    assert_eq!(outcome.message, "Domain verified but not using provider DNS");
    assert!(outcome.polling_scheduled);
}

#[tokio::test]
async fn verify_keeps_added_when_provider_not_verified() {
    let current = project(Some(("example.com", DomainStatus::Added)));
    let mut repo = repo_finding(&current);
    repo.expect_update_status().never();

    let outcome = service(repo, verifying_registrar(false), resolver_answering(&PROVIDER_NS))
        .verify(domain_request(&current, "example.com"))
        .await
        .expect("verify succeeds");

    assert_eq!(outcome.status, DomainStatus::Added);
    assert_eq!(outcome.message, "Domain not yet verified");
}

#[tokio::test]
async fn verify_tolerates_a_rejected_trigger() {
    let current = project(Some(("example.com", DomainStatus::Added)));
    let mut repo = repo_finding(&current);
    repo.expect_update_status().never();
    let mut registrar = MockDomainRegistrar::new();
    registrar
        .expect_verify_domain()
        .returning(|_| Err(DomainRegistrarError::upstream(400_u16, "missing_txt_record")));
    registrar
        .expect_get_domain()
        .returning(|domain| Ok(registered(domain.as_str(), false)));
    registrar
        .expect_domain_config()
        .returning(|_| Ok(DomainConfig::default()));

    let outcome = service(repo, registrar, resolver_answering(&PROVIDER_NS))
        .verify(domain_request(&current, "example.com"))
        .await
        .expect("trigger failure is not fatal");

    assert_eq!(outcome.status, DomainStatus::Added);
}

#[tokio::test]
async fn remove_with_mismatched_domain_changes_nothing() {
    let current = project(Some(("other.com", DomainStatus::Verified)));
    let mut repo = repo_finding(&current);
    repo.expect_clear_domain().never();
    let mut registrar = MockDomainRegistrar::new();
    registrar.expect_remove_domain().never();

    let err = service(repo, registrar, MockNameserverResolver::new())
        .remove(domain_request(&current, "example.com"))
        .await
        .expect_err("mismatch");

    assert_eq!(err.code(), ErrorCode::DomainMismatch);
}

#[tokio::test]
async fn remove_after_clear_reports_mismatch() {
    let current = project(None);

    let err = service(
        repo_finding(&current),
        MockDomainRegistrar::new(),
        MockNameserverResolver::new(),
    )
    .remove(domain_request(&current, "example.com"))
    .await
    .expect_err("nothing to remove");

    assert_eq!(err.code(), ErrorCode::DomainMismatch);
}

#[rstest]
#[case(Ok(()))]
#[case(Err(DomainRegistrarError::not_found(404_u16)))]
#[tokio::test]
async fn remove_clears_domain_and_status(#[case] registrar_result: Result<(), DomainRegistrarError>) {
    let current = project(Some(("example.com", DomainStatus::Added)));
    let cleared = with_domain(&current, None);
    let mut repo = repo_finding(&current);
    repo.expect_clear_domain()
        .with(eq(current.id))
        .times(1)
        .return_once(move |_| Ok(cleared));
    let mut registrar = MockDomainRegistrar::new();
    registrar
        .expect_remove_domain()
        .with(eq(name("example.com")))
        .times(1)
        .return_once(move |_| registrar_result);

    let outcome = service(repo, registrar, MockNameserverResolver::new())
        .remove(domain_request(&current, "example.com"))
        .await
        .expect("remove succeeds");

    assert!(outcome.project.domain().is_none());
    assert!(outcome.project.domain_status().is_none());
    assert_eq!(outcome.removed, name("example.com"));
}

#[tokio::test]
async fn remove_aborts_on_registrar_failure() {
    let current = project(Some(("example.com", DomainStatus::Verified)));
    let mut repo = repo_finding(&current);
    repo.expect_clear_domain().never();
    let mut registrar = MockDomainRegistrar::new();
    registrar
        .expect_remove_domain()
        .returning(|_| Err(DomainRegistrarError::upstream(500_u16, "internal error")));

    let err = service(repo, registrar, MockNameserverResolver::new())
        .remove(domain_request(&current, "example.com"))
        .await
        .expect_err("registrar failure");

    assert_eq!(err.code(), ErrorCode::RegistrarError);
}

#[tokio::test]
async fn remove_cancels_the_running_verification_poll() {
    let current = project(Some(("example.com", DomainStatus::Added)));
    let cleared = with_domain(&current, None);
    let promotions = Arc::new(AtomicUsize::new(0));
    let mut repo = repo_finding(&current);
    repo.expect_update_status().never();
    let counter = Arc::clone(&promotions);
    repo.expect_transition_status().returning(move |id, _, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(ProjectRepositoryError::not_found(id.to_string()))
    });
    repo.expect_clear_domain()
        .times(1)
        .return_once(move |_| Ok(cleared));
    let lookups = AtomicUsize::new(0);
    let mut registrar = MockDomainRegistrar::new();
    registrar
        .expect_verify_domain()
        .returning(|domain| Ok(registered(domain.as_str(), false)));
    registrar.expect_get_domain().returning(move |domain| {
        let verified = lookups.fetch_add(1, Ordering::SeqCst) > 0;
        Ok(registered(domain.as_str(), verified))
    });
    registrar
        .expect_domain_config()
        .returning(|_| Ok(DomainConfig::default()));
    registrar.expect_remove_domain().times(1).returning(|_| Ok(()));
    let svc = service_with(
        Arc::new(repo),
        Arc::new(registrar),
        resolver_answering(&PROVIDER_NS),
        Arc::new(BriefSleeper),
    );

    let verified = svc
        .verify(domain_request(&current, "example.com"))
        .await
        .expect("verify succeeds");
    assert!(verified.polling_scheduled);
    assert!(svc.poller.is_scheduled(&current.id));

    svc.remove(domain_request(&current, "example.com"))
        .await
        .expect("remove succeeds");
    assert!(!svc.poller.is_scheduled(&current.id));

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(promotions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn availability_reports_local_holder() {
    let holder = project(Some(("example.com", DomainStatus::Added)));
    let mut repo = MockProjectRepository::new();
    repo.expect_find_by_custom_domain()
        .return_once(move |_| Ok(Some(holder)));
    let mut registrar = MockDomainRegistrar::new();
    registrar.expect_get_domain().never();

    let availability = service(repo, registrar, MockNameserverResolver::new())
        .check_availability("example.com".to_owned())
        .await
        .expect("probe succeeds");

    assert!(!availability.available);
    assert_eq!(availability.reason, Some(UnavailableReason::InUse));
}

#[rstest]
#[case(Err(DomainRegistrarError::not_found(404_u16)), true, None)]
#[case(
    Ok(registered("example.com", false)),
    false,
    Some(UnavailableReason::RegisteredElsewhere)
)]
#[tokio::test]
async fn availability_consults_registrar(
    #[case] lookup: Result<RegisteredDomain, DomainRegistrarError>,
    #[case] available: bool,
    #[case] reason: Option<UnavailableReason>,
) {
    let mut repo = MockProjectRepository::new();
    repo.expect_find_by_custom_domain().returning(|_| Ok(None));
    let mut registrar = MockDomainRegistrar::new();
    registrar.expect_get_domain().return_once(move |_| lookup);

    let availability = service(repo, registrar, MockNameserverResolver::new())
        .check_availability("Example.com".to_owned())
        .await
        .expect("probe succeeds");

    assert_eq!(availability.domain, name("example.com"));
    assert_eq!(availability.available, available);
    assert_eq!(availability.reason, reason);
}

#[tokio::test]
async fn instructions_survive_registrar_outage() {
    let mut registrar = MockDomainRegistrar::new();
    registrar
        .expect_get_domain()
        .returning(|_| Err(DomainRegistrarError::transport("timeout")));

    let instructions = service(
        MockProjectRepository::new(),
        registrar,
        MockNameserverResolver::new(),
    )
    .instructions("example.com".to_owned())
    .await
    .expect("instructions are provider constant");

    assert_eq!(instructions.records.len(), 2);
    assert!(instructions.status.is_none());
}

#[tokio::test]
async fn instructions_include_current_status() {
    let mut registrar = MockDomainRegistrar::new();
    registrar
        .expect_get_domain()
        .returning(|_| Err(DomainRegistrarError::not_found(404_u16)));

    let instructions = service(
        MockProjectRepository::new(),
        registrar,
        MockNameserverResolver::new(),
    )
    .instructions("example.com".to_owned())
    .await
    .expect("instructions succeed");

    let status = instructions.status.expect("status present");
    assert!(!status.verified);
    assert!(!status.using_provider_dns);
}
