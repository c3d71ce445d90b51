//! Change proposal manager
//!
//! Turns catalog item mutations into GitHub branches, commits and pull
//! requests, and reads proposals back from pull request descriptions.

use crate::error::{not_found_error, AppError};
use crate::github::{GitHubClient, ListState, NewPullRequest, PullRequest};
use crate::proposal::branch::{
    branch_base_name, branch_name, path_in_repo, split_path, MAX_BRANCH_ATTEMPTS,
};
use crate::proposal::{ChangeProposal, ChangeSubmission, ChangeType, ProposalBody};
use tracing::{debug, info, warn};

pub struct ProposalManager {
    github: GitHubClient,
    main_branch: String,
    data_owner_label: String,
}

impl ProposalManager {
    pub fn new(
        github: GitHubClient,
        main_branch: impl Into<String>,
        data_owner_label: impl Into<String>,
    ) -> Self {
        Self {
            github,
            main_branch: main_branch.into(),
            data_owner_label: data_owner_label.into(),
        }
    }

    /// All proposals, open and closed, in GitHub's listing order.
    ///
    /// Pull requests whose description is not a proposal body were opened by
    /// hand; they are logged and skipped.
    pub async fn list_proposals(&self, user: Option<&str>) -> Result<Vec<ChangeProposal>, AppError> {
        let pulls = self.github.list_pulls(ListState::All).await?;

        Ok(pulls
            .iter()
            .filter_map(parse_pull)
            .filter(|proposal| user.map_or(true, |u| proposal.user == u))
            .collect())
    }

    /// Names under `item_type` on the main line
    pub async fn list_confirmed_items(&self, item_type: &str) -> Result<Vec<String>, AppError> {
        let tree_ish = format!("{}:{}", self.main_branch, item_type);
        match self.github.tree_entries(&tree_ish).await? {
            Some(entries) => Ok(entries.into_iter().map(|e| e.path).collect()),
            None => {
                info!("No tree for {}, nothing confirmed yet", item_type);
                Ok(Vec::new())
            }
        }
    }

    /// Submit an item change.
    ///
    /// An update to an item that already has an open proposal amends that
    /// proposal's branch; everything else goes to a fresh branch, and
    /// additions and updates get a new pull request.
    pub async fn submit_change(&self, submission: ChangeSubmission) -> Result<(), AppError> {
        let path = path_in_repo(&submission.item_type, &submission.filename);
        info!(
            "Submitting {} of {} for user {}",
            submission.change_type, path, submission.user
        );

        if submission.change_type == ChangeType::Update {
            if let Some(open) = self
                .find_open_proposal(&submission.item_type, &submission.filename)
                .await?
            {
                return self.amend(&open, &submission, &path).await;
            }
        }

        let message = format!("{} {} for pull request submission", submission.change_type, path);
        let previous_sha = self.previous_version_sha(&path).await?;

        match submission.change_type {
            ChangeType::Delete => {
                let sha = previous_sha
                    .ok_or_else(|| not_found_error(format!("{} does not exist", path)))?;
                let branch = self.create_branch(&branch_base_name(&path)).await?;
                self.github.delete_file(&path, &message, &sha, &branch).await?;
                info!("Deletion of {} committed to branch {}", path, branch);
            }
            ChangeType::Add | ChangeType::Update => {
                let content = submission.content.as_deref().ok_or_else(|| {
                    AppError::Validation(format!("{} requires file content", submission.change_type))
                })?;
                let branch = self.create_branch(&branch_base_name(&path)).await?;
                self.github
                    .put_file(&path, &message, content, previous_sha.as_deref(), &branch)
                    .await?;
                self.open_pull_request(&submission, &path, &branch).await?;
            }
        }

        Ok(())
    }

    async fn open_pull_request(
        &self,
        submission: &ChangeSubmission,
        path: &str,
        branch: &str,
    ) -> Result<(), AppError> {
        let title = format!("{} {}", submission.change_type, path);
        let body = submission.body().to_description();

        let pr = self
            .github
            .create_pull(&NewPullRequest {
                title: &title,
                body: &body,
                head: branch,
                base: &self.main_branch,
                maintainer_can_modify: true,
            })
            .await?;

        if submission.data_owner {
            self.github
                .set_labels(pr.number, std::slice::from_ref(&self.data_owner_label))
                .await?;
        }
        self.assign(pr.number, submission).await?;

        info!("Pull request #{} opened: {}", pr.number, pr.html_url);
        Ok(())
    }

    /// Overwrite the file on the head branch of an already open proposal
    async fn amend(
        &self,
        open: &PullRequest,
        submission: &ChangeSubmission,
        path: &str,
    ) -> Result<(), AppError> {
        let branch = &open.head.ref_name;
        let content = submission
            .content
            .as_deref()
            .ok_or_else(|| AppError::Validation("Update requires file content".to_string()))?;
        info!("Amending open pull request #{} on branch {}", open.number, branch);

        let sha = self.github.file_sha(path, branch).await?;
        let message = format!("Update {} for pull request submission", path);
        self.github
            .put_file(path, &message, content, sha.as_deref(), branch)
            .await?;
        self.assign(open.number, submission).await
    }

    async fn assign(&self, number: u64, submission: &ChangeSubmission) -> Result<(), AppError> {
        if !submission.assignees.is_empty() {
            self.github.add_assignees(number, &submission.assignees).await?;
        }
        if !submission.reviewers.is_empty() {
            self.github.request_reviewers(number, &submission.reviewers).await?;
        }
        Ok(())
    }

    /// First open pull request proposing a change to the same item
    async fn find_open_proposal(
        &self,
        item_type: &str,
        filename: &str,
    ) -> Result<Option<PullRequest>, AppError> {
        let open = self.github.list_pulls(ListState::Open).await?;
        Ok(open.into_iter().find(|pr| {
            ProposalBody::from_description(pr.body.as_deref())
                .map(|body| body.item_type == item_type && body.filename == filename)
                .unwrap_or(false)
        }))
    }

    /// Create a branch off the main line tip named after `base`, adding a
    /// numeric suffix while the name is taken.
    async fn create_branch(&self, base: &str) -> Result<String, AppError> {
        let head = self.github.branch_head(&self.main_branch).await?;
        let mut attempt = 1;

        loop {
            let name = branch_name(base, attempt);
            debug!("Creating branch {}", name);

            match self.github.create_ref(&format!("refs/heads/{}", name), &head).await {
                Ok(()) => return Ok(name),
                // 422 means the ref already exists
                Err(e) if e.is_unprocessable() && attempt < MAX_BRANCH_ATTEMPTS => {
                    warn!("Branch {} already exists, trying next suffix", name);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Blob sha of `path` on the main line; `None` for a new file, including
    /// when the parent directory does not exist yet.
    async fn previous_version_sha(&self, path: &str) -> Result<Option<String>, AppError> {
        let (parent, name) = split_path(path);
        let tree_ish = format!("{}:{}", self.main_branch, parent);

        let Some(entries) = self.github.tree_entries(&tree_ish).await? else {
            debug!("Parent of {} does not exist, treating as new file", path);
            return Ok(None);
        };
        Ok(entries.into_iter().find(|e| e.path == name).map(|e| e.sha))
    }
}

fn parse_pull(pr: &PullRequest) -> Option<ChangeProposal> {
    match ProposalBody::from_description(pr.body.as_deref()) {
        Ok(body) => Some(body.into_proposal(pr)),
        Err(e) => {
            info!("Found incompatible pull request #{}, ignoring: {}", pr.number, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GitHubConfig;
    use crate::proposal::ProposalState;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use url::Url;
    use wiremock::matchers::{body_partial_json, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    const REPO: &str = "/repos/owner/catalog";
    const FILE: &str = "/repos/owner/catalog/contents/stac_dist/a/a.json";
    const BRANCH: &str = "stac-dist-a-a-json";

    fn manager(server: &MockServer) -> ProposalManager {
        let github = GitHubClient::new(&GitHubConfig {
            api_url: Url::parse(&server.uri()).unwrap(),
            token: "token".to_string(),
            repo_id: "owner/catalog".to_string(),
            main_branch: "main".to_string(),
        })
        .unwrap();
        ProposalManager::new(github, "main", "DataOwner")
    }

    fn submission(change_type: ChangeType) -> ChangeSubmission {
        ChangeSubmission {
            item_type: "stac_dist".to_string(),
            filename: "a.json".to_string(),
            change_type,
            content: (change_type != ChangeType::Delete).then(|| b"{\n  \"id\": \"a\"\n}".to_vec()),
            user: "foo".to_string(),
            data_owner: false,
            assignees: Vec::new(),
            reviewers: Vec::new(),
        }
    }

    fn body_json(filename: &str) -> String {
        json!({
            "filename": filename,
            "item_type": "stac_dist",
            "change_type": "Add",
            "user": "foo",
            "data_owner": true
        })
        .to_string()
    }

    fn pull_json(number: u64, body: Option<String>, head: &str, state: &str, merged: bool) -> Value {
        json!({
            "number": number,
            "html_url": format!("https://github.com/owner/catalog/pull/{}", number),
            "state": state,
            "body": body,
            "created_at": "2000-01-01T00:00:00Z",
            "merged_at": if merged { Some("2000-01-02T00:00:00Z") } else { None },
            "head": { "ref": head }
        })
    }

    fn request_json(req: &Request) -> Value {
        serde_json::from_slice(&req.body).unwrap_or(Value::Null)
    }

    async fn mount_main_branch(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(format!("{}/branches/main", REPO)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "name": "main",
                "commit": { "sha": "main-tip" }
            })))
            .mount(server)
            .await;
    }

    async fn mount_tree(server: &MockServer, entries: Value) {
        let response = if entries.is_null() {
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" }))
        } else {
            ResponseTemplate::new(200).set_body_json(json!({ "sha": "tree", "tree": entries }))
        };
        Mock::given(method("GET"))
            .and(path_regex(r"^/repos/owner/catalog/git/trees/.+$"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    async fn mount_ref_ok(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path(format!("{}/git/refs", REPO)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .mount(server)
            .await;
    }

    async fn mount_open_pulls(server: &MockServer, pulls: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{}/pulls", REPO)))
            .and(query_param("state", "open"))
            .respond_with(ResponseTemplate::new(200).set_body_json(pulls))
            .mount(server)
            .await;
    }

    async fn expect_pull_creation(server: &MockServer, times: u64) {
        Mock::given(method("POST"))
            .and(path(format!("{}/pulls", REPO)))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(pull_json(7, None, BRANCH, "open", false)),
            )
            .expect(times)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_add_opens_one_pull_request() {
        let server = MockServer::start().await;
        mount_main_branch(&server).await;
        mount_tree(&server, Value::Null).await;

        Mock::given(method("POST"))
            .and(path(format!("{}/git/refs", REPO)))
            .and(body_partial_json(json!({ "ref": "refs/heads/stac-dist-a-a-json", "sha": "main-tip" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(FILE))
            .and(body_partial_json(json!({ "branch": BRANCH })))
            .and(|req: &Request| request_json(req).get("sha").is_none())
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/pulls", REPO)))
            .and(body_partial_json(json!({
                "title": "Add stac_dist/a/a.json",
                "head": BRANCH,
                "base": "main",
                "maintainer_can_modify": true
            })))
            .and(|req: &Request| {
                let body = request_json(req)["body"].as_str().map(str::to_string);
                ProposalBody::from_description(body.as_deref())
                    .map(|b| b.user == "foo" && b.change_type == ChangeType::Add)
                    .unwrap_or(false)
            })
            .respond_with(
                ResponseTemplate::new(201).set_body_json(pull_json(7, None, BRANCH, "open", false)),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("{}/issues/7/labels", REPO)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        manager(&server)
            .submit_change(submission(ChangeType::Add))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_data_owner_submission_is_labeled_and_assigned() {
        let server = MockServer::start().await;
        mount_main_branch(&server).await;
        mount_tree(&server, json!([{ "path": "a.json", "sha": "blob-1", "type": "blob" }])).await;
        mount_ref_ok(&server).await;

        Mock::given(method("PUT"))
            .and(path(FILE))
            .and(body_partial_json(json!({ "sha": "blob-1" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        expect_pull_creation(&server, 1).await;
        Mock::given(method("PUT"))
            .and(path(format!("{}/issues/7/labels", REPO)))
            .and(body_partial_json(json!({ "labels": ["DataOwner"] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/issues/7/assignees", REPO)))
            .and(body_partial_json(json!({ "assignees": ["alice"] })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/pulls/7/requested_reviewers", REPO)))
            .and(body_partial_json(json!({ "reviewers": ["bob"] })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let mut change = submission(ChangeType::Add);
        change.data_owner = true;
        change.assignees = vec!["alice".to_string()];
        change.reviewers = vec!["bob".to_string()];
        manager(&server).submit_change(change).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_amends_open_proposal() {
        let server = MockServer::start().await;
        let amended_branch = "stac-dist-a-a-json-3";
        mount_open_pulls(
            &server,
            json!([
                pull_json(3, Some("Manual PR".to_string()), "manual", "open", false),
                pull_json(5, Some(body_json("a.json")), amended_branch, "open", false),
            ]),
        )
        .await;

        Mock::given(method("GET"))
            .and(path(FILE))
            .and(query_param("ref", amended_branch))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "sha": "branch-blob" })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(FILE))
            .and(body_partial_json(json!({ "sha": "branch-blob", "branch": amended_branch })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/git/refs", REPO)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;
        expect_pull_creation(&server, 0).await;

        manager(&server)
            .submit_change(submission(ChangeType::Update))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_amended_proposal_gets_assignees_and_reviewers() {
        let server = MockServer::start().await;
        let amended_branch = "stac-dist-a-a-json";
        mount_open_pulls(
            &server,
            json!([pull_json(5, Some(body_json("a.json")), amended_branch, "open", false)]),
        )
        .await;

        Mock::given(method("GET"))
            .and(path(FILE))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(FILE))
            .and(|req: &Request| request_json(req).get("sha").is_none())
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/issues/5/assignees", REPO)))
            .and(body_partial_json(json!({ "assignees": ["alice"] })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/pulls/5/requested_reviewers", REPO)))
            .and(body_partial_json(json!({ "reviewers": ["bob"] })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(format!("{}/issues/5/labels", REPO)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;
        expect_pull_creation(&server, 0).await;

        let mut change = submission(ChangeType::Update);
        change.data_owner = true;
        change.assignees = vec!["alice".to_string()];
        change.reviewers = vec!["bob".to_string()];
        manager(&server).submit_change(change).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_without_open_proposal_opens_pull_request() {
        let server = MockServer::start().await;
        mount_open_pulls(
            &server,
            json!([pull_json(5, Some(body_json("other.json")), "other", "open", false)]),
        )
        .await;
        mount_main_branch(&server).await;
        mount_tree(&server, Value::Null).await;
        mount_ref_ok(&server).await;
        Mock::given(method("PUT"))
            .and(path(FILE))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/pulls", REPO)))
            .and(body_partial_json(json!({ "title": "Update stac_dist/a/a.json" })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(pull_json(7, None, BRANCH, "open", false)),
            )
            .expect(1)
            .mount(&server)
            .await;

        manager(&server)
            .submit_change(submission(ChangeType::Update))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_branch_collision_uses_next_suffix() {
        let server = MockServer::start().await;
        mount_main_branch(&server).await;
        mount_tree(&server, Value::Null).await;

        Mock::given(method("POST"))
            .and(path(format!("{}/git/refs", REPO)))
            .and(body_partial_json(json!({ "ref": "refs/heads/stac-dist-a-a-json" })))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "message": "Reference already exists" })),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/git/refs", REPO)))
            .and(body_partial_json(json!({ "ref": "refs/heads/stac-dist-a-a-json-2" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path(FILE))
            .and(body_partial_json(json!({ "branch": "stac-dist-a-a-json-2" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("{}/pulls", REPO)))
            .and(body_partial_json(json!({ "head": "stac-dist-a-a-json-2" })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(pull_json(7, None, BRANCH, "open", false)),
            )
            .expect(1)
            .mount(&server)
            .await;

        manager(&server)
            .submit_change(submission(ChangeType::Add))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_branch_collision_gives_up_after_max_attempts() {
        let server = MockServer::start().await;
        mount_main_branch(&server).await;
        mount_tree(&server, Value::Null).await;

        Mock::given(method("POST"))
            .and(path(format!("{}/git/refs", REPO)))
            .respond_with(
                ResponseTemplate::new(422).set_body_json(json!({ "message": "Reference already exists" })),
            )
            .expect(MAX_BRANCH_ATTEMPTS as u64)
            .mount(&server)
            .await;
        expect_pull_creation(&server, 0).await;

        let err = manager(&server)
            .submit_change(submission(ChangeType::Add))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GitHub(ref e) if e.is_unprocessable()));
    }

    #[tokio::test]
    async fn test_other_ref_errors_are_not_retried() {
        let server = MockServer::start().await;
        mount_main_branch(&server).await;
        mount_tree(&server, Value::Null).await;

        Mock::given(method("POST"))
            .and(path(format!("{}/git/refs", REPO)))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({ "message": "Forbidden" })))
            .expect(1)
            .mount(&server)
            .await;

        let err = manager(&server)
            .submit_change(submission(ChangeType::Add))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::GitHub(ref e) if e.status() == Some(reqwest::StatusCode::FORBIDDEN)));
    }

    #[tokio::test]
    async fn test_delete_sends_only_path_and_sha() {
        let server = MockServer::start().await;
        mount_main_branch(&server).await;
        mount_tree(&server, json!([{ "path": "a.json", "sha": "blob-1", "type": "blob" }])).await;
        mount_ref_ok(&server).await;

        Mock::given(method("DELETE"))
            .and(path(FILE))
            .and(body_partial_json(json!({ "sha": "blob-1", "branch": BRANCH })))
            .and(|req: &Request| request_json(req).get("content").is_none())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        expect_pull_creation(&server, 0).await;

        manager(&server)
            .submit_change(submission(ChangeType::Delete))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_of_missing_file_is_not_found() {
        let server = MockServer::start().await;
        mount_tree(&server, Value::Null).await;
        Mock::given(method("POST"))
            .and(path(format!("{}/git/refs", REPO)))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        let err = manager(&server)
            .submit_change(submission(ChangeType::Delete))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_skips_malformed_bodies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/pulls", REPO)))
            .and(query_param("state", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                pull_json(1, Some(body_json("pending_item.json")), "b1", "closed", true),
                pull_json(2, Some("{not json".to_string()), "b2", "open", false),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let proposals = manager(&server).list_proposals(None).await.unwrap();
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].filename, "pending_item.json");
        assert_eq!(proposals[0].state, ProposalState::Merged);
        assert_eq!(
            proposals[0].url.as_deref(),
            Some("https://github.com/owner/catalog/pull/1")
        );
    }

    #[tokio::test]
    async fn test_list_filters_by_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(format!("{}/pulls", REPO)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                pull_json(1, Some(body_json("a.json")), "b1", "open", false),
            ])))
            .mount(&server)
            .await;

        let manager = manager(&server);
        assert_eq!(manager.list_proposals(Some("foo")).await.unwrap().len(), 1);
        assert!(manager.list_proposals(Some("someone-else")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirmed_items_of_missing_directory_is_empty() {
        let server = MockServer::start().await;
        mount_tree(&server, Value::Null).await;

        let items = manager(&server).list_confirmed_items("stac_dist").await.unwrap();
        assert!(items.is_empty());
    }
}
