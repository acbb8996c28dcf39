use crate::client::RegistryClient;
use crate::error::Result;
use crate::http::HttpMethod;
use crate::query::QueryParams;
use crate::request::RequestBody;
use crate::types::{Rule, RuleLevel, RuleRequest, RuleResponse};

/// Global rules, applied to every artifact without an artifact-level rule of
/// the same type. Obtained from [`RegistryClient::admin`].
#[derive(Debug, Clone, Copy)]
pub struct AdminApi<'a> {
    client: &'a RegistryClient,
}

impl<'a> AdminApi<'a> {
    pub(crate) fn new(client: &'a RegistryClient) -> Self {
        Self { client }
    }

    pub fn list_global_rules(&self) -> Result<Vec<Rule>> {
        self.client.call(HttpMethod::Get, self.rules_url(None), None, 200)
    }

    pub fn create_global_rule(&self, rule: Rule, level: RuleLevel) -> Result<()> {
        let body = RequestBody::json(&RuleRequest {
            rule_type: rule,
            config: level,
        })?;
        self.client
            .call_empty(HttpMethod::Post, self.rules_url(None), Some(body), 204)
    }

    pub fn delete_all_global_rules(&self) -> Result<()> {
        self.client
            .call_empty(HttpMethod::Delete, self.rules_url(None), None, 204)
    }

    pub fn get_global_rule(&self, rule: Rule) -> Result<RuleLevel> {
        let response: RuleResponse = self
            .client
            .call(HttpMethod::Get, self.rules_url(Some(rule)), None, 200)?;
        Ok(response.config)
    }

    pub fn update_global_rule(&self, rule: Rule, level: RuleLevel) -> Result<()> {
        let body = RequestBody::json(&RuleRequest {
            rule_type: rule,
            config: level,
        })?;
        let _: RuleResponse = self
            .client
            .call(HttpMethod::Put, self.rules_url(Some(rule)), Some(body), 200)?;
        Ok(())
    }

    pub fn delete_global_rule(&self, rule: Rule) -> Result<()> {
        self.client
            .call_empty(HttpMethod::Delete, self.rules_url(Some(rule)), None, 204)
    }

    fn rules_url(&self, rule: Option<Rule>) -> String {
        match rule {
            Some(rule) => self.client.url(&["admin", "rules", rule.as_str()], &QueryParams::new()),
            None => self.client.url(&["admin", "rules"], &QueryParams::new()),
        }
    }
}
