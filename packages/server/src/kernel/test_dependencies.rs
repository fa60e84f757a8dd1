// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::{Arc, Mutex};

use super::{
    BaseAI, BaseEdgeFunctions, BaseEmailService, EdgeFunction, Job, JobQueue, OutgoingEmail,
    ServerDeps,
};

// =============================================================================
// Mock AI (Generic LLM capabilities)
// =============================================================================

pub struct MockAI {
    responses: Arc<Mutex<Vec<String>>>,
    calls: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl MockAI {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
        }
    }

    /// Every call returns an error
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Add a text response to the queue
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push(response.into());
        self
    }

    /// Add a JSON response to the queue (will be serialized)
    pub fn with_json_response<T: serde::Serialize>(self, data: &T) -> Self {
        let json = serde_json::to_string(data).expect("Failed to serialize mock response");
        self.responses.lock().unwrap().push(json);
        self
    }

    /// Get all user prompts that were sent to the AI
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a prompt containing the given text was sent
    pub fn was_called_with(&self, text: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|p| p.contains(text))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockAI {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseAI for MockAI {
    async fn complete(&self, _system_prompt: &str, user_prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(user_prompt.to_string());

        if self.fail {
            return Err(anyhow!("mock AI failure"));
        }

        let mut responses = self.responses.lock().unwrap();
        if !responses.is_empty() {
            Ok(responses.remove(0))
        } else {
            Ok("Mock AI response".to_string())
        }
    }
}

// =============================================================================
// Mock Edge Functions
// =============================================================================

pub struct MockEdgeFunctions {
    calls: Arc<Mutex<Vec<(EdgeFunction, serde_json::Value)>>>,
    response: serde_json::Value,
    fail: bool,
}

impl MockEdgeFunctions {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            response: serde_json::json!({ "success": true }),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    /// Body every successful invocation returns
    pub fn with_response(mut self, response: serde_json::Value) -> Self {
        self.response = response;
        self
    }

    pub fn calls(&self) -> Vec<(EdgeFunction, serde_json::Value)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn was_invoked(&self, function: EdgeFunction) -> bool {
        self.calls.lock().unwrap().iter().any(|(f, _)| *f == function)
    }
}

impl Default for MockEdgeFunctions {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEdgeFunctions for MockEdgeFunctions {
    async fn invoke(
        &self,
        function: EdgeFunction,
        payload: serde_json::Value,
    ) -> Result<serde_json::Value> {
        self.calls.lock().unwrap().push((function, payload));

        if self.fail {
            return Err(anyhow!("edge function {} returned 500: mock failure", function));
        }
        Ok(self.response.clone())
    }
}

// =============================================================================
// Mock Email Service
// =============================================================================

pub struct MockEmailService {
    sent: Arc<Mutex<Vec<OutgoingEmail>>>,
}

impl MockEmailService {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    pub fn was_sent_to(&self, address: &str) -> bool {
        self.sent.lock().unwrap().iter().any(|e| e.to == address)
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseEmailService for MockEmailService {
    async fn send_email(&self, email: OutgoingEmail) -> Result<String> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(email);
        Ok(format!("mock-email-{}", sent.len()))
    }
}

// =============================================================================
// Spy Job Queue
// =============================================================================

/// Records enqueued jobs without running them
pub struct SpyJobQueue {
    jobs: Arc<Mutex<Vec<Job>>>,
}

impl SpyJobQueue {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().clone()
    }

    pub fn was_enqueued(&self, job: &Job) -> bool {
        self.jobs.lock().unwrap().contains(job)
    }
}

impl Default for SpyJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobQueue for SpyJobQueue {
    async fn enqueue(&self, job: Job) -> Result<()> {
        self.jobs.lock().unwrap().push(job);
        Ok(())
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub ai: Option<Arc<MockAI>>,
    pub edge_functions: Arc<MockEdgeFunctions>,
    pub email: Arc<MockEmailService>,
    pub job_queue: Arc<SpyJobQueue>,
}

impl TestDependencies {
    /// No AI (keyword classification), succeeding edge functions and e-mail
    pub fn new() -> Self {
        Self {
            ai: None,
            edge_functions: Arc::new(MockEdgeFunctions::new()),
            email: Arc::new(MockEmailService::new()),
            job_queue: Arc::new(SpyJobQueue::new()),
        }
    }

    /// Set a mock AI
    pub fn mock_ai(mut self, ai: MockAI) -> Self {
        self.ai = Some(Arc::new(ai));
        self
    }

    /// Set mock edge functions
    pub fn mock_edge_functions(mut self, edge_functions: MockEdgeFunctions) -> Self {
        self.edge_functions = Arc::new(edge_functions);
        self
    }

    /// Convert into ServerDeps for testing
    pub fn into_deps(self, db_pool: PgPool) -> ServerDeps {
        let mut deps = ServerDeps::new(db_pool, self.job_queue);
        deps.ai = self.ai.map(|ai| ai as Arc<dyn BaseAI>);
        deps.edge_functions = Some(self.edge_functions);
        deps.email = Some(self.email);
        deps
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
