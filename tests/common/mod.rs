//! Scripted host capabilities and throwaway AL projects for the flow tests

#![allow(dead_code)]

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use bc_pte_deploy::api::{HttpResponse, HttpTransport};
use bc_pte_deploy::deploy::{Builder, ChoiceOption, Interaction, Reporter, TextPrompt};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

pub const MANIFEST: &str = r#"{
    "id": "7f4e0c4e-0000-0000-0000-000000000000",
    "name": "Foo",
    "publisher": "Acme",
    "version": "1.2.3.4"
}"#;

pub const ONE_ENVIRONMENT: &str = r#"{
    "version": "0.2.0",
    "configurations": [
        {
            "type": "PTE",
            "request": "AL PTE Publish",
            "name": "Customer sandbox",
            "tenant": "tenant-1",
            "environmentName": "sandbox",
            "clientID": "client-1",
            "clientSecret": "super-secret-1",
        },
    ]
}"#;

pub const TWO_ENVIRONMENTS: &str = r#"{
    "configurations": [
        {
            "type": "al",
            "request": "launch",
            "name": "Local"
        },
        {
            "type": "PTE",
            "request": "AL PTE Publish",
            "name": "Customer",
            "tenant": "tenant-1",
            "environmentName": "sandbox",
            "clientID": "client-1",
            "clientSecret": "super-secret-1"
        },
        {
            "type": "PTE",
            "request": "AL PTE Publish",
            "name": "Customer",
            "tenant": "tenant-2",
            "environmentName": "production",
            "companyName": "CRONUS USA",
            "clientID": "client-2",
            "clientSecret": "super-secret-2"
        }
    ]
}"#;

pub const ACCESS_TOKEN: &str = "eyJ0eXAiOiJKV1QiLCJhbGciOiJSUzI1NiJ9.test-token";

pub const ARTIFACT: &str = "Acme_Foo_1.2.3.4.app";

/// A temporary AL project directory
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    /// app.json, launch.json and a non-empty artifact for 1.2.3.4
    pub fn standard(launch: &str) -> Self {
        let project = Self::new();
        project.write_manifest(MANIFEST);
        project.write_launch(launch);
        project.write_artifact(ARTIFACT, b"PK\x03\x04 app package");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write_manifest(&self, content: &str) {
        fs::write(self.path().join("app.json"), content).expect("write app.json");
    }

    pub fn read_manifest(&self) -> String {
        fs::read_to_string(self.path().join("app.json")).expect("read app.json")
    }

    pub fn write_launch(&self, content: &str) {
        let dir = self.path().join(".vscode");
        fs::create_dir_all(&dir).expect("create .vscode");
        fs::write(dir.join("launch.json"), content).expect("write launch.json");
    }

    pub fn write_artifact(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path().join(name);
        fs::write(&path, bytes).expect("write artifact");
        path
    }

    pub fn lock_path(&self) -> PathBuf {
        self.path().join(".vscode").join(".bc-pte-deploy.lock")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Post,
    Get,
    Patch,
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub form: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body_len: usize,
}

impl RecordedCall {
    pub fn form_value(&self, name: &str) -> Option<&str> {
        self.form
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Transport answering each kind of request with a canned response.
///
/// `None` for a response simulates a connection failure.
pub struct ScriptedTransport {
    pub token: Option<HttpResponse>,
    pub companies: Option<HttpResponse>,
    pub upload: Option<HttpResponse>,
    pub status: Option<HttpResponse>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    /// Every step succeeds with a single company and an empty status list
    pub fn happy() -> Self {
        Self {
            token: Some(HttpResponse::new(
                200,
                format!(
                    r#"{{"token_type":"Bearer","expires_in":3599,"ext_expires_in":3599,"access_token":"{}"}}"#,
                    ACCESS_TOKEN
                ),
            )),
            companies: Some(HttpResponse::new(
                200,
                r#"{"value":[{"id":"c0ffee00-0000-0000-0000-000000000001","name":"CRONUS","displayName":"CRONUS Inc."}]}"#,
            )),
            upload: Some(HttpResponse::new(204, "")),
            status: Some(HttpResponse::new(200, r#"{"value":[]}"#)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().expect("calls lock").push(call);
    }

    fn answer(response: &Option<HttpResponse>) -> Result<HttpResponse> {
        response
            .clone()
            .ok_or_else(|| anyhow!("connection refused"))
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<HttpResponse> {
        self.record(RecordedCall {
            method: Method::Post,
            url: url.to_string(),
            bearer: None,
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            headers: Vec::new(),
            body_len: 0,
        });
        Self::answer(&self.token)
    }

    async fn get_json(&self, url: &str, bearer: &str) -> Result<HttpResponse> {
        self.record(RecordedCall {
            method: Method::Get,
            url: url.to_string(),
            bearer: Some(bearer.to_string()),
            form: Vec::new(),
            headers: Vec::new(),
            body_len: 0,
        });
        if url.contains("extensionDeploymentStatus") {
            Self::answer(&self.status)
        } else {
            Self::answer(&self.companies)
        }
    }

    async fn patch_binary(
        &self,
        url: &str,
        bearer: &str,
        extra_headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<HttpResponse> {
        self.record(RecordedCall {
            method: Method::Patch,
            url: url.to_string(),
            bearer: Some(bearer.to_string()),
            form: Vec::new(),
            headers: extra_headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body_len: body.len(),
        });
        Self::answer(&self.upload)
    }
}

/// Interaction replaying queued answers; panics when asked something unscripted
#[derive(Default)]
pub struct ScriptedInteraction {
    pub choices: VecDeque<Option<usize>>,
    pub texts: VecDeque<Option<String>>,
    pub choose_calls: Vec<Vec<ChoiceOption>>,
    pub text_calls: Vec<TextPrompt>,
}

impl ScriptedInteraction {
    pub fn choosing(choice: Option<usize>) -> Self {
        Self {
            choices: VecDeque::from([choice]),
            ..Default::default()
        }
    }

    pub fn answering(text: Option<&str>) -> Self {
        Self {
            texts: VecDeque::from([text.map(str::to_string)]),
            ..Default::default()
        }
    }
}

impl Interaction for ScriptedInteraction {
    fn choose(&mut self, _prompt: &str, options: &[ChoiceOption]) -> Result<Option<usize>> {
        self.choose_calls.push(options.to_vec());
        match self.choices.pop_front() {
            Some(choice) => Ok(choice),
            None => bail!("unexpected choice prompt"),
        }
    }

    fn prompt_text(&mut self, question: &TextPrompt) -> Result<Option<String>> {
        self.text_calls.push(question.clone());
        match self.texts.pop_front() {
            Some(text) => Ok(text),
            None => bail!("unexpected text prompt"),
        }
    }
}

#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub progress: Vec<String>,
    pub logs: Vec<String>,
    pub infos: Vec<String>,
    pub errors: Vec<String>,
}

impl RecordingReporter {
    /// Everything that was written anywhere
    pub fn all_text(&self) -> String {
        [&self.progress, &self.logs, &self.infos, &self.errors]
            .iter()
            .flat_map(|lines| lines.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Reporter for RecordingReporter {
    fn progress(&mut self, msg: &str) {
        self.progress.push(msg.to_string());
    }

    fn log(&mut self, msg: &str) {
        self.logs.push(msg.to_string());
    }

    fn info(&mut self, msg: &str) {
        self.infos.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }
}

/// Build capability that succeeds or fails on demand and counts invocations
pub struct FakeBuilder {
    succeed: bool,
    calls: AtomicUsize,
}

impl FakeBuilder {
    pub fn ok() -> Self {
        Self {
            succeed: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            succeed: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Builder for FakeBuilder {
    async fn build(&self, _project_dir: &Path) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.succeed {
            Ok(())
        } else {
            bail!("error AL0118: The name 'Foo' does not exist in the current context")
        }
    }
}
