use std::time::Duration;

use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tgp_twingate::model::{
    AccessGroup, AccessInput, GROUP_TYPE_MANUAL, GROUP_TYPE_SYNCED, GroupsFilter, NameFilter,
    Resource, ServiceAccountKey, ServiceAccountUpdate,
};
use tgp_twingate::{RequestContext, TwingateClient, TwingateConfig};

fn client(server: &MockServer) -> TwingateClient {
    let config = TwingateConfig {
        api_token: "token-1".into(),
        server_url: Some(server.uri()),
        http_max_retry: 0,
        retry_wait_min: Duration::ZERO,
        retry_wait_max: Duration::ZERO,
        page_limit: 50,
        ..TwingateConfig::default()
    };
    TwingateClient::new(&config).expect("client")
}

fn data(value: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": value }))
}

fn resource_node(access: Value) -> Value {
    json!({
        "id": "R1",
        "name": "db",
        "address": {"value": "db.internal"},
        "remoteNetwork": {"id": "N1"},
        "protocols": {
            "allowIcmp": false,
            "tcp": {"policy": "RESTRICTED", "ports": [{"start": 5432, "end": 5432}]},
            "udp": {"policy": "DENY_ALL", "ports": []}
        },
        "isActive": true,
        "isVisible": true,
        "isBrowserShortcutEnabled": false,
        "alias": "",
        "securityPolicy": null,
        "tags": [{"key": "env", "value": "prod"}],
        "access": access
    })
}

#[tokio::test]
async fn resource_access_is_read_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readResource",
            "variables": {"id": "R1", "accessEndCursor": null}
        })))
        .respond_with(data(json!({"resource": resource_node(json!({
            "pageInfo": {"endCursor": "acc-1", "hasNextPage": true},
            "edges": [{
                "node": {"__typename": "Group", "id": "G1"},
                "securityPolicy": {"id": "P1"}
            }]
        }))})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readResource_readResourceAccessAfter",
            "variables": {"id": "R1", "accessEndCursor": "acc-1"}
        })))
        .respond_with(data(json!({"resource": {
            "id": "R1",
            "access": {
                "pageInfo": {"hasNextPage": false},
                "edges": [
                    {"node": {"__typename": "ServiceAccount", "id": "S1"}, "securityPolicy": null},
                    {"node": {"__typename": "Group", "id": "G2"}, "securityPolicy": null}
                ]
            }
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let resource = client(&server)
        .read_resource(&RequestContext::new(), "R1")
        .await
        .expect("resource");

    assert_eq!(resource.address, "db.internal");
    assert_eq!(resource.alias, None);
    assert_eq!(resource.tags.get("env").map(String::as_str), Some("prod"));
    assert_eq!(resource.protocols.tcp.ports[0].start, 5432);
    assert_eq!(
        resource.groups_access,
        vec![
            AccessGroup {
                group_id: "G1".into(),
                security_policy_id: Some("P1".into()),
            },
            AccessGroup {
                group_id: "G2".into(),
                security_policy_id: None,
            },
        ]
    );
    assert_eq!(resource.service_accounts, vec!["S1".to_string()]);
}

#[tokio::test]
async fn access_without_principal_id_is_a_conversion_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(data(json!({"resource": resource_node(json!({
            "pageInfo": {"hasNextPage": false},
            "edges": [{"node": {"__typename": "Group", "id": ""}, "securityPolicy": null}]
        }))})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .read_resource(&RequestContext::new(), "R1")
        .await
        .expect_err("missing id");
    assert_eq!(
        err.to_string(),
        "failed to read resource with id R1: access group ID is missing in response"
    );
}

#[tokio::test]
async fn empty_resource_access_page_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "readResource"})))
        .respond_with(data(json!({"resource": resource_node(json!({
            "pageInfo": {"endCursor": "acc-1", "hasNextPage": true},
            "edges": []
        }))})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readResource_readResourceAccessAfter"
        })))
        .respond_with(data(json!({"resource": null})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .read_resource(&RequestContext::new(), "R1")
        .await
        .expect_err("empty page");
    assert!(err.is_empty_result());
    assert_eq!(
        err.to_string(),
        "failed to read resource access with id R1: query result is empty"
    );
}

#[tokio::test]
async fn created_resource_has_no_access() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "createResource",
            "variables": {
                "remoteNetworkId": "N1",
                "name": "db",
                "address": "db.internal",
                "alias": null,
                "tags": [{"key": "env", "value": "prod"}]
            }
        })))
        .respond_with(data(json!({"resourceCreate": {
            "ok": true,
            "error": null,
            "entity": resource_node(Value::Null)
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let mut input = Resource {
        remote_network_id: "N1".into(),
        name: "db".into(),
        address: "db.internal".into(),
        ..Resource::default()
    };
    input.tags.insert("env".into(), "prod".into());

    let created = client(&server)
        .create_resource(&RequestContext::new(), &input)
        .await
        .expect("created");
    assert_eq!(created.id, "R1");
    assert!(created.groups_access.is_empty());
    assert!(created.service_accounts.is_empty());
}

#[tokio::test]
async fn service_account_keeps_only_active_entries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "readServiceAccount"})))
        .respond_with(data(json!({"serviceAccount": {
            "id": "S1",
            "name": "ci",
            "resources": {
                "pageInfo": {"endCursor": "res-1", "hasNextPage": true},
                "edges": [
                    {"node": {"id": "R1", "isActive": true}},
                    {"node": {"id": "R2", "isActive": false}}
                ]
            },
            "keys": {
                "pageInfo": {"hasNextPage": false},
                "edges": [
                    {"node": {"id": "K1", "status": "ACTIVE"}},
                    {"node": {"id": "K2", "status": "REVOKED"}}
                ]
            }
        }})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readServiceAccount_readServiceAccountResources",
            "variables": {"resourcesEndCursor": "res-1"}
        })))
        .respond_with(data(json!({"serviceAccount": {"resources": {
            "pageInfo": {"hasNextPage": false},
            "edges": [{"node": {"id": "R3", "isActive": true}}]
        }}})))
        .expect(1)
        .mount(&server)
        .await;

    let account = client(&server)
        .read_service_account(&RequestContext::new(), "S1")
        .await
        .expect("account");
    assert_eq!(account.resources, vec!["R1".to_string(), "R3".to_string()]);
    assert_eq!(account.keys, vec!["K1".to_string()]);
}

#[tokio::test]
async fn service_account_update_needs_a_change() {
    let server = MockServer::start().await;
    let update = ServiceAccountUpdate {
        id: "S1".into(),
        ..ServiceAccountUpdate::default()
    };

    let err = client(&server)
        .update_service_account(&RequestContext::new(), &update)
        .await
        .expect_err("nothing to update");
    assert_eq!(
        err.to_string(),
        "failed to update service account with id S1: name is empty"
    );
}

#[tokio::test]
async fn created_key_carries_its_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "createServiceAccountKey",
            "variables": {"serviceAccountId": "S1", "name": "deploy", "expirationTime": 0}
        })))
        .respond_with(data(json!({"serviceAccountKeyCreate": {
            "ok": true,
            "error": null,
            "token": "secret-token",
            "entity": {
                "id": "K1",
                "name": "deploy",
                "expiresAt": null,
                "status": "ACTIVE",
                "serviceAccount": {"id": "S1"}
            }
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let key = ServiceAccountKey {
        service_account_id: "S1".into(),
        name: "deploy".into(),
        ..ServiceAccountKey::default()
    };
    let created = client(&server)
        .create_service_account_key(&RequestContext::new(), &key)
        .await
        .expect("key");
    assert_eq!(created.token.as_deref(), Some("secret-token"));
    assert_eq!(created.expiration_time, 0);
    assert!(created.is_active());
}

#[tokio::test]
async fn revoke_rejection_names_the_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "revokeServiceAccountKey"})))
        .respond_with(data(json!({"serviceAccountKeyRevoke": {
            "ok": false,
            "error": "key is already revoked"
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .revoke_service_account_key(&RequestContext::new(), "K1")
        .await
        .expect_err("rejected");
    assert_eq!(
        err.to_string(),
        "failed to revoke service account key with id K1: key is already revoked"
    );
}

#[tokio::test]
async fn exact_name_filter_reads_by_name_then_filters_locally() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readGroups",
            "variables": {"name": "eng"}
        })))
        .respond_with(data(json!({"groups": {
            "pageInfo": {"hasNextPage": false},
            "edges": [
                {"node": {"id": "G1", "name": "eng", "type": "MANUAL", "isActive": true}},
                {"node": {"id": "G2", "name": "eng", "type": "SYNCED", "isActive": true}}
            ]
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let filter = GroupsFilter {
        name: Some("eng".into()),
        group_type: Some(GROUP_TYPE_SYNCED.into()),
        ..GroupsFilter::default()
    };
    let groups = client(&server)
        .filter_groups(&RequestContext::new(), &filter)
        .await
        .expect("groups");
    let ids: Vec<&str> = groups.iter().map(|g| g.id.as_str()).collect();
    assert_eq!(ids, ["G2"]);
}

#[tokio::test]
async fn filter_without_match_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readGroups",
            "variables": {"filter": {
                "type": {"in": ["MANUAL"]},
                "isActive": {"eq": true},
                "name": {"startsWith": "data"}
            }}
        })))
        .respond_with(data(json!({"groups": {
            "pageInfo": {"hasNextPage": false},
            "edges": []
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let filter = GroupsFilter {
        name: Some("data".into()),
        name_filter: NameFilter::Prefix,
        group_type: Some(GROUP_TYPE_MANUAL.into()),
        is_active: None,
    };
    let groups = client(&server)
        .filter_groups(&RequestContext::new(), &filter)
        .await
        .expect("groups");
    assert!(groups.is_empty());
}

#[tokio::test]
async fn security_policies_filter_by_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readSecurityPolicies",
            "variables": {"filter": {"name": {"contains": "Default"}}}
        })))
        .respond_with(data(json!({"securityPolicies": {
            "pageInfo": {"hasNextPage": false},
            "edges": [{"node": {"id": "P1", "name": "Default Policy", "policyType": "DEFAULT"}}]
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let policies = client(&server)
        .read_security_policies(&RequestContext::new(), Some("Default"), NameFilter::Contains)
        .await
        .expect("policies");
    assert_eq!(policies.len(), 1);
    assert_eq!(policies[0].policy_type, "DEFAULT");
}

#[tokio::test]
async fn dns_profile_groups_are_read_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "readDNSFilteringProfile"})))
        .respond_with(data(json!({"dnsFilteringProfile": {
            "id": "D1",
            "name": "strict",
            "priority": 2.0,
            "allowedDomains": ["example.com"],
            "deniedDomains": [],
            "fallbackMethod": "STRICT",
            "groups": {
                "pageInfo": {"endCursor": "grp-1", "hasNextPage": true},
                "edges": [{"node": {"id": "G1"}}]
            },
            "privacyCategoryConfig": {"blockAffiliate": true},
            "securityCategoryConfig": null,
            "contentCategoryConfig": null
        }})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readDNSFilteringProfile_readDNSFilteringProfileGroups",
            "variables": {"groupsEndCursor": "grp-1"}
        })))
        .respond_with(data(json!({"dnsFilteringProfile": {"groups": {
            "pageInfo": {"hasNextPage": false},
            "edges": [{"node": {"id": "G2"}}]
        }}})))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server)
        .read_dns_filtering_profile(&RequestContext::new(), "D1")
        .await
        .expect("profile");
    assert_eq!(profile.groups, vec!["G1".to_string(), "G2".to_string()]);
    assert_eq!(profile.allowed_domains, vec!["example.com".to_string()]);
    assert!(profile.privacy_categories.is_some_and(|c| c.block_affiliate));
}

#[tokio::test]
async fn resource_access_is_granted_and_revoked() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "addResourceAccess",
            "variables": {
                "id": "R1",
                "access": [
                    {"principalId": "G1", "securityPolicyId": "P1"},
                    {"principalId": "S1", "securityPolicyId": null}
                ]
            }
        })))
        .respond_with(data(json!({"resourceAccessAdd": {"ok": true, "error": null}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "removeResourceAccess",
            "variables": {"id": "R1", "principalIds": ["G2"]}
        })))
        .respond_with(data(json!({"resourceAccessRemove": {"ok": true, "error": null}})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    let ctx = RequestContext::new();
    let grant = AccessGroup {
        group_id: "G1".into(),
        security_policy_id: Some("P1".into()),
    };
    let access = vec![
        AccessInput::from(&grant),
        AccessInput {
            principal_id: "S1".into(),
            security_policy_id: None,
        },
    ];

    client
        .add_resource_access(&ctx, "R1", &access)
        .await
        .expect("granted");
    client
        .remove_resource_access(&ctx, "R1", &["G2".to_string()])
        .await
        .expect("revoked");
}

#[tokio::test]
async fn resource_access_changes_without_principals_send_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(data(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client(&server);
    let ctx = RequestContext::new();

    client
        .add_resource_access(&ctx, "R1", &[])
        .await
        .expect("no-op");
    client
        .remove_resource_access(&ctx, "R1", &[])
        .await
        .expect("no-op");

    let err = client
        .add_resource_access(&ctx, "", &[AccessInput::default()])
        .await
        .expect_err("no resource id");
    assert_eq!(
        err.to_string(),
        "failed to update resource access: id is empty"
    );
    let err = client
        .remove_resource_access(&ctx, "", &["G1".to_string()])
        .await
        .expect_err("no resource id");
    assert_eq!(
        err.to_string(),
        "failed to delete resource access: id is empty"
    );
}

#[tokio::test]
async fn resource_access_rejection_names_the_resource() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "removeResourceAccess"})))
        .respond_with(data(json!({"resourceAccessRemove": {
            "ok": false,
            "error": "principal not found"
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .remove_resource_access(&RequestContext::new(), "R1", &["G9".to_string()])
        .await
        .expect_err("rejected");
    assert!(err.is_business_rejection());
    assert_eq!(
        err.to_string(),
        "failed to delete resource access with id R1: principal not found"
    );
}

#[tokio::test]
async fn resources_by_name_are_read_across_pages() {
    let server = MockServer::start().await;

    let mut second = resource_node(Value::Null);
    second["id"] = json!("R2");
    second["name"] = json!("db-replica");

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readResourcesByName",
            "variables": {
                "filter": {"name": {"startsWith": "db"}},
                "resourcesEndCursor": null
            }
        })))
        .respond_with(data(json!({"resources": {
            "pageInfo": {"endCursor": "res-1", "hasNextPage": true},
            "edges": [{"node": resource_node(Value::Null)}]
        }})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readResourcesByName",
            "variables": {"resourcesEndCursor": "res-1"}
        })))
        .respond_with(data(json!({"resources": {
            "pageInfo": {"endCursor": null, "hasNextPage": false},
            "edges": [{"node": second}]
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let resources = client(&server)
        .read_resources_by_name(&RequestContext::new(), "db", NameFilter::Prefix)
        .await
        .expect("resources");
    let names: Vec<_> = resources.iter().map(|resource| resource.name.as_str()).collect();
    assert_eq!(names, ["db", "db-replica"]);
    assert!(resources.iter().all(|resource| resource.groups_access.is_empty()));
}

#[tokio::test]
async fn resources_by_name_without_match_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(data(json!({"resources": {
            "pageInfo": {"hasNextPage": false},
            "edges": []
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .read_resources_by_name(&RequestContext::new(), "nothing", NameFilter::Exact)
        .await
        .expect_err("no match");
    assert!(err.is_empty_result());
    assert_eq!(
        err.to_string(),
        "failed to read resource with id All: query result is empty"
    );
}

#[tokio::test]
async fn resource_active_state_is_toggled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "updateResourceActiveState",
            "variables": {"id": "R1", "isActive": false}
        })))
        .respond_with(data(json!({"resourceUpdate": {"ok": true, "error": null}})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .update_resource_active_state(&RequestContext::new(), "R1", false)
        .await
        .expect("deactivated");
}

#[tokio::test]
async fn shallow_service_accounts_are_read_across_pages() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readShallowServiceAccounts",
            "variables": {"servicesEndCursor": null}
        })))
        .respond_with(data(json!({"serviceAccounts": {
            "pageInfo": {"endCursor": "svc-1", "hasNextPage": true},
            "edges": [{"node": {"id": "S1", "name": "ci"}}]
        }})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readShallowServiceAccounts",
            "variables": {"servicesEndCursor": "svc-1"}
        })))
        .respond_with(data(json!({"serviceAccounts": {
            "pageInfo": {"endCursor": null, "hasNextPage": false},
            "edges": [{"node": {"id": "S2", "name": "deploy"}}]
        }})))
        .expect(1)
        .mount(&server)
        .await;

    let accounts = client(&server)
        .read_shallow_service_accounts(&RequestContext::new())
        .await
        .expect("accounts");
    let ids: Vec<_> = accounts.iter().map(|account| account.id.as_str()).collect();
    assert_eq!(ids, ["S1", "S2"]);
    assert!(accounts.iter().all(|account| account.resources.is_empty()));
}

#[tokio::test]
async fn service_account_resources_are_removed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "readShallowServiceAccount",
            "variables": {"id": "S1"}
        })))
        .respond_with(data(json!({"serviceAccount": {"id": "S1", "name": "ci"}})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "updateServiceAccountRemoveResources",
            "variables": {"id": "S1", "removedResourceIds": ["R1", "R2"]}
        })))
        .respond_with(data(json!({"serviceAccountUpdate": {"ok": true, "error": null}})))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .remove_service_account_resources(
            &RequestContext::new(),
            "S1",
            &["R1".to_string(), "R2".to_string()],
        )
        .await
        .expect("removed");
}

#[tokio::test]
async fn removing_resources_from_a_missing_account_is_a_no_op() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({"operationName": "readShallowServiceAccount"})))
        .respond_with(data(json!({"serviceAccount": null})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "operationName": "updateServiceAccountRemoveResources"
        })))
        .respond_with(data(json!({"serviceAccountUpdate": {"ok": true}})))
        .expect(0)
        .mount(&server)
        .await;

    client(&server)
        .remove_service_account_resources(&RequestContext::new(), "S1", &["R1".to_string()])
        .await
        .expect("nothing to remove");
}
