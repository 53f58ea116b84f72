//! Tests for custom-domain HTTP handlers.

use super::*;
use crate::domain::ports::{
    AttachDomainOutcome, DomainAvailability, MockDomainWorkflow, MockProjectCommand,
    RegisteredDomain, RemoveDomainOutcome, SetupInstructions, UnavailableReason,
    VerificationRecord, VerifyDomainOutcome,
};
use crate::domain::{
    DnsRecord, DomainAttachment, DomainName, DomainStatus, Error, ErrorCode, Project,
    ProjectName, Subdomain, VerificationStatus,
};
use crate::inbound::http::validation::json_config;
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use std::sync::Arc;

const PROJECT_UUID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn project() -> Project {
    let name = ProjectName::new("Shop").expect("valid name");
    let subdomain = Subdomain::derive(&name).expect("valid subdomain");
    let at = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let mut project = Project::new(name, subdomain, at);
    project.id = PROJECT_UUID.parse().expect("valid id");
    project
}

fn domain(raw: &str) -> DomainName {
    DomainName::from_trusted(raw).expect("valid domain")
}

fn txt_record() -> VerificationRecord {
    VerificationRecord {
        record_type: "TXT".to_owned(),
        domain: "_vercel.shop.example.org".to_owned(),
        value: "vc-domain-verify=abc".to_owned(),
        reason: "pending_domain_verification".to_owned(),
    }
}

fn test_app(
    workflow: MockDomainWorkflow,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(workflow), Arc::new(MockProjectCommand::new()));
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .service(
            web::scope("/api")
                .service(attach_domain)
                .service(verify_domain)
                .service(remove_domain)
                .service(check_domain)
                .service(domain_instructions),
        )
}

async fn send(workflow: MockDomainWorkflow, request: actix_http::Request) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(workflow)).await;
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn attach_returns_created_with_project_and_records(project: Project) {
    let mut workflow = MockDomainWorkflow::new();
    let attached = {
        let mut p = project.clone();
        p.custom_domain = Some(DomainAttachment {
            domain: domain("shop.example.org"),
            status: DomainStatus::Added,
        });
        p
    };
    workflow
        .expect_attach()
        .withf(|request| {
            request.project_id.to_string() == PROJECT_UUID && request.domain == "Shop.Example.org"
        })
        .times(1)
        .return_once(move |_| {
            Ok(AttachDomainOutcome {
                project: attached,
                registered: RegisteredDomain {
                    name: "shop.example.org".to_owned(),
                    apex_name: "example.org".to_owned(),
                    verified: false,
                    verification: vec![txt_record()],
                },
            })
        });

    let request = actix_test::TestRequest::post()
        .uri("/api/domains")
        .set_json(json!({"projectId": PROJECT_UUID, "domain": "Shop.Example.org"}))
        .to_request();
    let (status, body) = send(workflow, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["project"]["customDomain"], "shop.example.org");
    assert_eq!(body["project"]["domainStatus"], "added");
    assert_eq!(body["domain"]["apexName"], "example.org");
    assert_eq!(body["domain"]["verification"][0]["type"], "TXT");
}

#[rstest]
#[case(json!({"projectId": PROJECT_UUID}), "domain")]
#[case(json!({"domain": "shop.example.org"}), "projectId")]
#[case(json!({"projectId": PROJECT_UUID, "domain": "  "}), "domain")]
#[actix_web::test]
async fn attach_rejects_missing_fields_without_calling_workflow(
    #[case] payload: Value,
    #[case] field: &str,
) {
    let request = actix_test::TestRequest::post()
        .uri("/api/domains")
        .set_json(payload)
        .to_request();
    let (status, body) = send(MockDomainWorkflow::new(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_REQUEST");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn attach_rejects_non_uuid_project_id() {
    let request = actix_test::TestRequest::post()
        .uri("/api/domains")
        .set_json(json!({"projectId": "shop", "domain": "shop.example.org"}))
        .to_request();
    let (status, body) = send(MockDomainWorkflow::new(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_uuid");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_error_envelope() {
    let request = actix_test::TestRequest::post()
        .uri("/api/domains")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let (status, body) = send(MockDomainWorkflow::new(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "INVALID_REQUEST");
}

#[rstest]
#[actix_web::test]
async fn attach_conflicts_map_to_409() {
    let mut workflow = MockDomainWorkflow::new();
    workflow.expect_attach().return_once(|_| {
        Err(Error::domain_in_use(
            "shop.example.org is already attached to a project",
        ))
    });

    let request = actix_test::TestRequest::post()
        .uri("/api/domains")
        .set_json(json!({"projectId": PROJECT_UUID, "domain": "shop.example.org"}))
        .to_request();
    let (status, body) = send(workflow, request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "DOMAIN_IN_USE");
}

#[rstest]
#[actix_web::test]
async fn verify_flattens_verification_status() {
    let mut workflow = MockDomainWorkflow::new();
    workflow
        .expect_verify()
        .withf(|request| request.domain == "shop.example.org")
        .return_once(|_| {
            Ok(VerifyDomainOutcome {
                domain: domain("shop.example.org"),
                status: DomainStatus::Added,
                verification: VerificationStatus {
                    verified: true,
                    verification: Vec::new(),
                    using_provider_dns: false,
                    misconfigured: None,
                },
                message: "Domain verified but not using provider DNS".to_owned(),
                polling_scheduled: true,
            })
        });

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/domains/{PROJECT_UUID}/verify"))
        .set_json(json!({"domain": "shop.example.org"}))
        .to_request();
    let (status, body) = send(workflow, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "domain": "shop.example.org",
            "status": "added",
            "verified": true,
            "usingProviderDns": false,
            "misconfigured": null,
            "verification": [],
            "message": "Domain verified but not using provider DNS",
            "pollingScheduled": true,
        })
    );
}

#[rstest]
#[case(Error::new(ErrorCode::DomainPending, "domain is still being added; retry later"), StatusCode::CONFLICT)]
#[case(Error::new(ErrorCode::DomainMismatch, "domain does not match"), StatusCode::BAD_REQUEST)]
#[case(Error::new(ErrorCode::NoCustomDomain, "project has no custom domain"), StatusCode::BAD_REQUEST)]
#[case(Error::not_found("project not found"), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn verify_errors_keep_their_status(#[case] error: Error, #[case] expected: StatusCode) {
    let code = error.code();
    let mut workflow = MockDomainWorkflow::new();
    workflow.expect_verify().return_once(move |_| Err(error));

    let request = actix_test::TestRequest::post()
        .uri(&format!("/api/domains/{PROJECT_UUID}/verify"))
        .set_json(json!({"domain": "shop.example.org"}))
        .to_request();
    let (status, body) = send(workflow, request).await;

    assert_eq!(status, expected);
    assert_eq!(body["error"], code.as_str());
}

#[rstest]
#[actix_web::test]
async fn remove_reports_cleared_project(project: Project) {
    let mut workflow = MockDomainWorkflow::new();
    workflow
        .expect_remove()
        .withf(|request| {
            request.project_id.to_string() == PROJECT_UUID && request.domain == "shop.example.org"
        })
        .return_once(move |_| {
            Ok(RemoveDomainOutcome {
                project,
                removed: domain("shop.example.org"),
            })
        });

    let request = actix_test::TestRequest::delete()
        .uri(&format!("/api/domains/{PROJECT_UUID}"))
        .set_json(json!({"domain": "shop.example.org"}))
        .to_request();
    let (status, body) = send(workflow, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removedDomain"], "shop.example.org");
    assert_eq!(body["project"]["customDomain"], Value::Null);
    assert_eq!(body["project"]["domainStatus"], Value::Null);
}

#[rstest]
#[actix_web::test]
async fn check_reports_reason_when_unavailable() {
    let mut workflow = MockDomainWorkflow::new();
    workflow
        .expect_check_availability()
        .withf(|raw| raw == "shop.example.org")
        .return_once(|_| {
            Ok(DomainAvailability {
                domain: domain("shop.example.org"),
                available: false,
                reason: Some(UnavailableReason::RegisteredElsewhere),
            })
        });

    let request = actix_test::TestRequest::get()
        .uri("/api/domains/check/shop.example.org")
        .to_request();
    let (status, body) = send(workflow, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "domain": "shop.example.org",
            "available": false,
            "reason": "DOMAIN_NOT_AVAILABLE",
        })
    );
}

#[rstest]
#[actix_web::test]
async fn check_omits_reason_when_available() {
    let mut workflow = MockDomainWorkflow::new();
    workflow.expect_check_availability().return_once(|_| {
        Ok(DomainAvailability {
            domain: domain("fresh.example.org"),
            available: true,
            reason: None,
        })
    });

    let request = actix_test::TestRequest::get()
        .uri("/api/domains/check/fresh.example.org")
        .to_request();
    let (_, body) = send(workflow, request).await;

    assert_eq!(body["available"], true);
    assert!(body.get("reason").is_none());
}

#[rstest]
#[actix_web::test]
async fn instructions_list_nameserver_records() {
    let mut workflow = MockDomainWorkflow::new();
    workflow.expect_instructions().return_once(|_| {
        Ok(SetupInstructions {
            domain: domain("shop.example.org"),
            records: ["ns1.vercel-dns.com", "ns2.vercel-dns.com"]
                .into_iter()
                .map(|ns| DnsRecord {
                    record_type: "NS".to_owned(),
                    name: "@".to_owned(),
                    value: ns.to_owned(),
                })
                .collect(),
            status: None,
        })
    });

    let request = actix_test::TestRequest::get()
        .uri("/api/domains/instructions/shop.example.org")
        .to_request();
    let (status, body) = send(workflow, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["dnsRecords"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["dnsRecords"][0], json!({"type": "NS", "name": "@", "value": "ns1.vercel-dns.com"}));
    assert_eq!(body["status"], Value::Null);
}
