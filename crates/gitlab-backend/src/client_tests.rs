//! Unit tests for GitLabClient using wiremock

#[cfg(test)]
mod tests {
    use crate::client::GitLabClient;
    use label_core::{label, LabelName, LabelStore, LabelUpdate, RemoteLabel, StoreError};
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GitLabClient {
        GitLabClient::new(&server.uri(), "test-token", "123")
    }

    #[tokio::test]
    async fn test_list_labels() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/123/labels"))
            .and(query_param("page", "1"))
            .and(query_param("include_ancestor_groups", "false"))
            .and(header("PRIVATE-TOKEN", "test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "bug", "color": "#fc2929", "description": "Something is broken"},
                {"id": 2, "name": "feature", "color": "#44ad8e", "description": "New feature"}
            ])))
            .mount(&mock_server)
            .await;

        let labels = LabelStore::list_labels(&client(&mock_server)).unwrap();

        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].name.as_str(), "bug");
        assert_eq!(labels[0].color.as_ref().unwrap().as_str(), "fc2929");
        assert_eq!(
            labels[0].description.as_ref().unwrap().as_str(),
            "Something is broken"
        );
        assert_eq!(labels[1].name.as_str(), "feature");
    }

    #[tokio::test]
    async fn test_list_keeps_labels_with_named_colors() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/123/labels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "name": "bug", "color": "red", "description": null}
            ])))
            .mount(&mock_server)
            .await;

        let labels = LabelStore::list_labels(&client(&mock_server)).unwrap();

        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name.as_str(), "bug");
        assert!(labels[0].color.is_none());
    }

    #[tokio::test]
    async fn test_project_path_is_encoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/group%2Fproject/labels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = GitLabClient::new(&mock_server.uri(), "test-token", "group/project");
        let labels = client.list_labels_page(1, 100).unwrap();
        assert!(labels.is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_label_is_none() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/123/labels/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "404 Label Not Found"
            })))
            .mount(&mock_server)
            .await;

        let name = LabelName::parse("ghost").unwrap();
        let result = LabelStore::get_label(&client(&mock_server), &name).unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_label() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/projects/123/labels"))
            .and(body_json(serde_json::json!({
                "name": "new-label",
                "color": "#ededed",
                "description": "A new label"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": 42,
                "name": "new-label",
                "color": "#ededed",
                "description": "A new label"
            })))
            .mount(&mock_server)
            .await;

        let definition = label("new-label", "ededed", Some("A new label")).unwrap();
        let created = LabelStore::create_label(&client(&mock_server), &definition).unwrap();

        assert_eq!(created.name.as_str(), "new-label");
        assert_eq!(created.color.unwrap().as_str(), "ededed");
    }

    #[tokio::test]
    async fn test_delete_label_by_name() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/projects/123/labels/old%20label"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let name = LabelName::parse("old label").unwrap();
        let result = LabelStore::delete_label(&client(&mock_server), &name);
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_rename_uses_put_with_new_name() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/projects/123/labels/enhancement"))
            .and(body_json(serde_json::json!({
                "new_name": "feature",
                "color": "#0075ca",
                "description": "New work"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 42,
                "name": "feature",
                "color": "#0075ca",
                "description": "New work"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let current = RemoteLabel::new("enhancement", "#000000", None).unwrap();
        let desired = label("feature", "0075ca", Some("New work")).unwrap();
        let update = LabelUpdate::from_definition(&current, &desired);

        let updated =
            LabelStore::update_label(&client(&mock_server), &current.name, &update).unwrap();
        assert_eq!(updated.name.as_str(), "feature");
    }

    #[tokio::test]
    async fn test_update_missing_label_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/projects/123/labels/ghost"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "404 Label Not Found"
            })))
            .mount(&mock_server)
            .await;

        let current = RemoteLabel::new("ghost", "000000", None).unwrap();
        let desired = label("ghost", "ffffff", None).unwrap();
        let err = LabelStore::update_label(
            &client(&mock_server),
            &current.name,
            &LabelUpdate::from_definition(&current, &desired),
        )
        .unwrap_err();

        assert_eq!(err, StoreError::NotFound("ghost".to_string()));
    }

    #[tokio::test]
    async fn test_field_errors_are_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/projects/123/labels"))
            .respond_with(ResponseTemplate::new(409).set_body_json(serde_json::json!({
                "message": "Label already exists"
            })))
            .mount(&mock_server)
            .await;

        let definition = label("bug", "d73a4a", None).unwrap();
        let err = LabelStore::create_label(&client(&mock_server), &definition).unwrap_err();

        match err {
            StoreError::Api { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Label already exists");
            }
            other => panic!("Expected Api error, got: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/projects/123/labels"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "message": "401 Unauthorized"
            })))
            .mount(&mock_server)
            .await;

        let err = LabelStore::list_labels(&client(&mock_server)).unwrap_err();
        assert_eq!(err, StoreError::Unauthorized);
    }
}
