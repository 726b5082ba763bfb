//! Live board adapter over the GitHub GraphQL (v4) API.
//!
//! One client implements both [`BoardReader`] and [`MutationSink`]. The
//! project node id and the Status field id are resolved once at
//! construction; status option ids are resolved by name per mutation.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::ports::{BoardIssue, BoardReader, BoxError, Mutation, MutationSink, PortFuture};

const GITHUB_GRAPHQL_URL: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = concat!("boardkeeper/", env!("CARGO_PKG_VERSION"));

/// Live GitHub Projects (v2) board client.
#[derive(Clone)]
pub struct GitHubBoard {
    client: Client,
    token: String,
    project_id: String,
    status_field_id: String,
}

#[derive(Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct ProjectMetadata {
    organization: OrgNode,
}

#[derive(Deserialize)]
struct OrgNode {
    #[serde(rename = "projectV2")]
    project: Option<ProjectNode>,
}

#[derive(Deserialize)]
struct ProjectNode {
    id: String,
    fields: Nodes<FieldNode>,
}

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct FieldNode {
    #[serde(rename = "__typename")]
    typename: String,
    id: Option<String>,
    name: Option<String>,
}

#[derive(Deserialize)]
struct StatusOptionsData {
    node: StatusOptionsProject,
}

#[derive(Deserialize)]
struct StatusOptionsProject {
    field: Option<StatusOptionsField>,
}

#[derive(Deserialize)]
struct StatusOptionsField {
    options: Vec<StatusOption>,
}

#[derive(Deserialize)]
struct StatusOption {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct ItemsPageData {
    node: ItemsPageProject,
}

#[derive(Deserialize)]
struct ItemsPageProject {
    items: ItemsPage,
}

#[derive(Deserialize)]
struct ItemsPage {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    nodes: Vec<ItemNode>,
}

#[derive(Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

#[derive(Deserialize)]
struct ItemNode {
    id: String,
    content: Option<ItemContent>,
    #[serde(rename = "fieldValueByName")]
    status_value: Option<StatusValue>,
}

#[derive(Deserialize)]
struct ItemContent {
    #[serde(rename = "__typename")]
    typename: String,
    number: Option<u64>,
    title: Option<String>,
    body: Option<String>,
    url: Option<String>,
    #[serde(rename = "updatedAt")]
    updated_at: Option<chrono::DateTime<chrono::Utc>>,
    assignees: Option<Nodes<Login>>,
    repository: Option<RepositoryRef>,
}

#[derive(Deserialize)]
struct Login {
    login: String,
}

#[derive(Deserialize)]
struct RepositoryRef {
    id: String,
}

#[derive(Deserialize)]
struct StatusValue {
    name: Option<String>,
}

#[derive(Deserialize)]
struct RepoIssueData {
    repository: Option<RepoWithIssue>,
}

#[derive(Deserialize)]
struct RepoWithIssue {
    id: String,
    issue: Option<IssueFields>,
}

#[derive(Deserialize)]
struct IssueFields {
    id: String,
    number: u64,
    title: String,
    body: Option<String>,
    url: String,
    #[serde(rename = "updatedAt")]
    updated_at: chrono::DateTime<chrono::Utc>,
    assignees: Nodes<Login>,
}

#[derive(Deserialize)]
struct ProjectItemsData {
    node: IssueProjectItems,
}

#[derive(Deserialize)]
struct IssueProjectItems {
    #[serde(rename = "projectItems")]
    project_items: Nodes<ProjectItemNode>,
}

#[derive(Deserialize)]
struct ProjectItemNode {
    id: String,
    project: ProjectIdRef,
    #[serde(rename = "fieldValueByName")]
    status_value: Option<StatusValue>,
}

#[derive(Deserialize)]
struct ProjectIdRef {
    id: String,
}

#[derive(Deserialize)]
struct IssueNodeIdData {
    node: RepoIssueNode,
}

#[derive(Deserialize)]
struct RepoIssueNode {
    issue: Option<NodeId>,
}

#[derive(Deserialize)]
struct NodeId {
    id: String,
}

impl GitHubBoard {
    /// Connects to the organization project and resolves the project
    /// node id and Status field id.
    ///
    /// # Errors
    ///
    /// Returns an error if the project cannot be queried or has no
    /// single-select Status field.
    pub async fn connect(token: &str, org: &str, project_number: u64) -> Result<Self, BoxError> {
        let mut board = Self {
            client: Client::new(),
            token: token.to_string(),
            project_id: String::new(),
            status_field_id: String::new(),
        };

        let data: ProjectMetadata = board
            .graphql(
                "query($org: String!, $number: Int!) {\n\
                   organization(login: $org) {\n\
                     projectV2(number: $number) {\n\
                       id\n\
                       fields(first: 20) {\n\
                         nodes {\n\
                           __typename\n\
                           ... on ProjectV2SingleSelectField { id name }\n\
                         }\n\
                       }\n\
                     }\n\
                   }\n\
                 }",
                json!({ "org": org, "number": project_number }),
            )
            .await?;

        let project = data
            .organization
            .project
            .ok_or_else(|| format!("project {project_number} not found in organization {org}"))?;
        board.status_field_id = find_status_field(&project.fields.nodes)
            .ok_or("project has no single-select Status field")?;
        board.project_id = project.id;
        Ok(board)
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T, BoxError> {
        let response = self
            .client
            .post(GITHUB_GRAPHQL_URL)
            .bearer_auth(&self.token)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| format!("GitHub API request failed: {e}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| format!("failed to read GitHub API response: {e}"))?;

        if !status.is_success() {
            return Err(format!("GitHub API error ({}): {text}", status.as_u16()).into());
        }

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| format!("failed to parse GitHub API response: {e}"))?;

        if let Some(errors) = envelope.errors {
            if let Some(first) = errors.first() {
                return Err(format!("GitHub GraphQL error: {}", first.message).into());
            }
        }

        envelope.data.ok_or_else(|| "GitHub API response missing data".into())
    }

    async fn status_option_id(&self, status: &str) -> Result<String, BoxError> {
        let data: StatusOptionsData = self
            .graphql(
                "query($projectId: ID!) {\n\
                   node(id: $projectId) {\n\
                     ... on ProjectV2 {\n\
                       field(name: \"Status\") {\n\
                         ... on ProjectV2SingleSelectField { options { id name } }\n\
                       }\n\
                     }\n\
                   }\n\
                 }",
                json!({ "projectId": self.project_id }),
            )
            .await?;

        data.node
            .field
            .ok_or("project has no Status field")?
            .options
            .into_iter()
            .find(|option| option.name == status)
            .map(|option| option.id)
            .ok_or_else(|| format!("status option {status:?} not found").into())
    }

    async fn issue_node_id(&self, issue: &BoardIssue) -> Result<String, BoxError> {
        let data: IssueNodeIdData = self
            .graphql(
                "query($repoId: ID!, $number: Int!) {\n\
                   node(id: $repoId) {\n\
                     ... on Repository { issue(number: $number) { id } }\n\
                   }\n\
                 }",
                json!({ "repoId": issue.repository_id, "number": issue.number }),
            )
            .await?;

        data.node
            .issue
            .map(|node| node.id)
            .ok_or_else(|| format!("issue #{} not found in repository", issue.number).into())
    }

    async fn fetch_issue(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Option<BoardIssue>, BoxError> {
        let data: RepoIssueData = self
            .graphql(
                "query($owner: String!, $repo: String!, $number: Int!) {\n\
                   repository(owner: $owner, name: $repo) {\n\
                     id\n\
                     issue(number: $number) {\n\
                       id number title body url updatedAt\n\
                       assignees(first: 10) { nodes { login } }\n\
                     }\n\
                   }\n\
                 }",
                json!({ "owner": owner, "repo": repo, "number": number }),
            )
            .await?;

        let Some(repository) = data.repository else { return Ok(None) };
        let Some(issue) = repository.issue else { return Ok(None) };

        // The issue exists; it still has to be a member of our project.
        let items: ProjectItemsData = self
            .graphql(
                "query($issueId: ID!) {\n\
                   node(id: $issueId) {\n\
                     ... on Issue {\n\
                       projectItems(first: 10) {\n\
                         nodes {\n\
                           id\n\
                           project { id }\n\
                           fieldValueByName(name: \"Status\") {\n\
                             ... on ProjectV2ItemFieldSingleSelectValue { name }\n\
                           }\n\
                         }\n\
                       }\n\
                     }\n\
                   }\n\
                 }",
                json!({ "issueId": issue.id }),
            )
            .await?;

        let Some(item) = items
            .node
            .project_items
            .nodes
            .into_iter()
            .find(|item| item.project.id == self.project_id)
        else {
            return Ok(None);
        };

        Ok(Some(BoardIssue {
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
            url: issue.url,
            updated_at: issue.updated_at,
            assignees: issue.assignees.nodes.into_iter().map(|a| a.login).collect(),
            item_id: item.id,
            status: item.status_value.and_then(|v| v.name).unwrap_or_default(),
            repository_id: repository.id,
            status_field_id: self.status_field_id.clone(),
        }))
    }

    async fn fetch_by_status(&self, statuses: &[String]) -> Result<Vec<BoardIssue>, BoxError> {
        let mut issues = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let data: ItemsPageData = self
                .graphql(
                    "query($projectId: ID!, $cursor: String) {\n\
                       node(id: $projectId) {\n\
                         ... on ProjectV2 {\n\
                           items(first: 100, after: $cursor) {\n\
                             pageInfo { hasNextPage endCursor }\n\
                             nodes {\n\
                               id\n\
                               content {\n\
                                 __typename\n\
                                 ... on Issue {\n\
                                   number title body url updatedAt\n\
                                   assignees(first: 10) { nodes { login } }\n\
                                   repository { id }\n\
                                 }\n\
                               }\n\
                               fieldValueByName(name: \"Status\") {\n\
                                 ... on ProjectV2ItemFieldSingleSelectValue { name }\n\
                               }\n\
                             }\n\
                           }\n\
                         }\n\
                       }\n\
                     }",
                    json!({ "projectId": self.project_id, "cursor": cursor }),
                )
                .await?;

            let page = data.node.items;
            issues.extend(collect_page_issues(page.nodes, statuses, &self.status_field_id));

            if !page.page_info.has_next_page {
                break;
            }
            cursor = page.page_info.end_cursor;
        }

        Ok(issues)
    }

    async fn apply_status(&self, issue: &BoardIssue, status: &str) -> Result<Mutation, BoxError> {
        if !issue.on_board() {
            return Err(format!("issue #{} is not a board member", issue.number).into());
        }

        let option_id = self.status_option_id(status).await?;
        let _: serde_json::Value = self
            .graphql(
                "mutation($projectId: ID!, $itemId: ID!, $fieldId: ID!, $optionId: String!) {\n\
                   updateProjectV2ItemFieldValue(input: {\n\
                     projectId: $projectId, itemId: $itemId, fieldId: $fieldId,\n\
                     value: { singleSelectOptionId: $optionId }\n\
                   }) { projectV2Item { id } }\n\
                 }",
                json!({
                    "projectId": self.project_id,
                    "itemId": issue.item_id,
                    "fieldId": self.status_field_id,
                    "optionId": option_id,
                }),
            )
            .await?;

        Ok(Mutation::Applied)
    }

    async fn apply_comment(&self, issue: &BoardIssue, body: &str) -> Result<Mutation, BoxError> {
        let subject_id = self.issue_node_id(issue).await?;
        let _: serde_json::Value = self
            .graphql(
                "mutation($subjectId: ID!, $body: String!) {\n\
                   addComment(input: { subjectId: $subjectId, body: $body }) {\n\
                     commentEdge { node { id } }\n\
                   }\n\
                 }",
                json!({ "subjectId": subject_id, "body": body }),
            )
            .await?;

        Ok(Mutation::Applied)
    }
}

fn find_status_field(fields: &[FieldNode]) -> Option<String> {
    fields
        .iter()
        .find(|field| {
            field.typename == "ProjectV2SingleSelectField"
                && field.name.as_deref() == Some("Status")
        })
        .and_then(|field| field.id.clone())
}

fn collect_page_issues(
    nodes: Vec<ItemNode>,
    statuses: &[String],
    status_field_id: &str,
) -> Vec<BoardIssue> {
    let mut issues = Vec::new();
    for item in nodes {
        let Some(content) = item.content else { continue };
        // Draft issues and PRs also live on the board; skip them.
        if content.typename != "Issue" {
            continue;
        }
        let status = item.status_value.and_then(|v| v.name).unwrap_or_default();
        if !statuses.contains(&status) {
            continue;
        }
        let (Some(number), Some(repository)) = (content.number, content.repository) else {
            continue;
        };
        issues.push(BoardIssue {
            number,
            title: content.title.unwrap_or_default(),
            body: content.body.unwrap_or_default(),
            url: content.url.unwrap_or_default(),
            updated_at: content.updated_at.unwrap_or_default(),
            assignees: content
                .assignees
                .map(|a| a.nodes.into_iter().map(|n| n.login).collect())
                .unwrap_or_default(),
            item_id: item.id,
            status,
            repository_id: repository.id,
            status_field_id: status_field_id.to_string(),
        });
    }
    issues
}

/// Comment body used to cross-reference a PR from an issue.
fn cross_reference_body(pr_owner: &str, pr_repo: &str, pr_number: u64) -> String {
    format!("Linked to PR {pr_owner}/{pr_repo}#{pr_number}")
}

impl BoardReader for GitHubBoard {
    fn issue_on_board(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> PortFuture<'_, Option<BoardIssue>> {
        let owner = owner.to_string();
        let repo = repo.to_string();
        Box::pin(async move { self.fetch_issue(&owner, &repo, number).await })
    }

    fn issues_by_status(&self, statuses: &[String]) -> PortFuture<'_, Vec<BoardIssue>> {
        let statuses = statuses.to_vec();
        Box::pin(async move { self.fetch_by_status(&statuses).await })
    }
}

impl MutationSink for GitHubBoard {
    fn set_status(&self, issue: &BoardIssue, status: &str) -> PortFuture<'_, Mutation> {
        let issue = issue.clone();
        let status = status.to_string();
        Box::pin(async move { self.apply_status(&issue, &status).await })
    }

    fn add_cross_reference_comment(
        &self,
        issue: &BoardIssue,
        pr_owner: &str,
        pr_repo: &str,
        pr_number: u64,
    ) -> PortFuture<'_, Mutation> {
        let issue = issue.clone();
        let body = cross_reference_body(pr_owner, pr_repo, pr_number);
        Box::pin(async move { self.apply_comment(&issue, &body).await })
    }

    fn add_comment(&self, issue: &BoardIssue, body: &str) -> PortFuture<'_, Mutation> {
        let issue = issue.clone();
        let body = body.to_string();
        Box::pin(async move { self.apply_comment(&issue, &body).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_field_is_found_among_project_fields() {
        let fields: Nodes<FieldNode> = serde_json::from_value(serde_json::json!({
            "nodes": [
                { "__typename": "ProjectV2Field", "id": "f1", "name": "Initiative" },
                { "__typename": "ProjectV2SingleSelectField", "id": "f2", "name": "Priority" },
                { "__typename": "ProjectV2SingleSelectField", "id": "f3", "name": "Status" },
            ]
        }))
        .unwrap();
        assert_eq!(find_status_field(&fields.nodes), Some("f3".to_string()));
    }

    #[test]
    fn missing_status_field_yields_none() {
        let fields: Nodes<FieldNode> = serde_json::from_value(serde_json::json!({
            "nodes": [{ "__typename": "ProjectV2Field", "id": "f1", "name": "Initiative" }]
        }))
        .unwrap();
        assert_eq!(find_status_field(&fields.nodes), None);
    }

    #[test]
    fn page_items_filter_by_type_and_status() {
        let page: ItemsPage = serde_json::from_value(serde_json::json!({
            "pageInfo": { "hasNextPage": false, "endCursor": null },
            "nodes": [
                {
                    "id": "item-1",
                    "content": {
                        "__typename": "Issue",
                        "number": 7,
                        "title": "Fix login",
                        "body": "details",
                        "url": "https://github.com/acme/app/issues/7",
                        "updatedAt": "2026-01-15T10:00:00Z",
                        "assignees": { "nodes": [{ "login": "kai" }] },
                        "repository": { "id": "repo-1" }
                    },
                    "fieldValueByName": { "name": "In Progress" }
                },
                {
                    "id": "item-2",
                    "content": { "__typename": "PullRequest" },
                    "fieldValueByName": { "name": "In Progress" }
                },
                {
                    "id": "item-3",
                    "content": {
                        "__typename": "Issue",
                        "number": 9,
                        "title": "Done thing",
                        "repository": { "id": "repo-1" }
                    },
                    "fieldValueByName": { "name": "Done" }
                }
            ]
        }))
        .unwrap();

        let statuses = vec!["In Progress".to_string(), "Sprint Backlog".to_string()];
        let issues = collect_page_issues(page.nodes, &statuses, "field-1");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].number, 7);
        assert_eq!(issues[0].item_id, "item-1");
        assert_eq!(issues[0].assignees, vec!["kai".to_string()]);
        assert_eq!(issues[0].status, "In Progress");
        assert!(issues[0].on_board());
    }

    #[test]
    fn cross_reference_body_names_the_pr() {
        assert_eq!(cross_reference_body("acme", "app", 12), "Linked to PR acme/app#12");
    }

    #[test]
    fn graphql_errors_are_surfaced_from_envelope() {
        let envelope: Envelope<serde_json::Value> = serde_json::from_str(
            r#"{ "data": null, "errors": [{ "message": "bad credentials" }] }"#,
        )
        .unwrap();
        assert_eq!(envelope.errors.unwrap()[0].message, "bad credentials");
    }
}
