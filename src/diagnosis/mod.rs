//! The diagnosis pipeline.
//!
//! `DiagnosisEngine` sequences the whole flow for one request:
//! validate, sanitize, rate-limit, detect an error code, then work down
//! the source tiers (cached diagnosis, web-grounded LLM, static
//! fallback) and persist whatever was produced.
//!
//! The tier chain is a series of explicit matches over typed outcomes,
//! not exception handling: after the two pre-flight gates (validation,
//! rate limit) the pipeline is total and always yields a
//! [`DiagnosisResult`]. Upstream failures degrade: search failure means
//! no enrichment, LLM failure means the fallback, a failed insert is
//! logged and dropped.

pub mod cache;
pub mod defaults;
pub mod error;
pub mod error_code;
pub mod fallback;
pub mod parser;
pub mod record;
pub mod sanitize;
pub mod types;

pub use error::DiagnoseError;
pub use error_code::detect_error_code;
pub use fallback::fallback_diagnosis;
pub use parser::{parse_diagnosis, ParseContext};
pub use record::DiagnosisRecord;
pub use types::{
    Difficulty, DiagnosisRequest, DiagnosisResult, Recommendations, ServiceType, Urgency,
};

use crate::config::TriageConfig;
use crate::llm::{build_diagnosis_prompt, ChatClient, OpenAiChatClient};
use crate::ratelimit::{RateLimitDecision, RateLimiter};
use crate::search::{gather_enrichment, provider_from_config, Enrichment, SearchProvider};
use crate::store::{DiagnosisStore, SupabaseStore};
use cache::CacheOutcome;
use sanitize::SanitizedRequest;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Orchestrates one diagnosis request end to end.
pub struct DiagnosisEngine {
    store: Arc<dyn DiagnosisStore>,
    llm: Option<Arc<dyn ChatClient>>,
    search: Option<Arc<dyn SearchProvider>>,
    limiter: Arc<RateLimiter>,
}

impl DiagnosisEngine {
    /// Construct with injected collaborators (tests use stubs here).
    pub fn new(
        store: Arc<dyn DiagnosisStore>,
        llm: Option<Arc<dyn ChatClient>>,
        search: Option<Arc<dyn SearchProvider>>,
        limiter: Arc<RateLimiter>,
    ) -> Self {
        Self {
            store,
            llm,
            search,
            limiter,
        }
    }

    /// Build the production engine: Supabase store, the configured
    /// chat-completion backend (if a key is present), and whichever
    /// search provider has a credential. Resolved once at startup.
    pub fn from_config(config: &TriageConfig) -> Self {
        let store = Arc::new(SupabaseStore::new(
            config.store.url.clone(),
            config.store.service_key(),
            config.store.table.clone(),
            config.store.rpc.clone(),
        ));

        let llm: Option<Arc<dyn ChatClient>> = match config.llm.api_key() {
            Some(key) => {
                info!(model = %config.llm.model, "LLM diagnosis enabled");
                Some(Arc::new(OpenAiChatClient::new(
                    config.llm.base_url.clone(),
                    key,
                    config.llm.model.clone(),
                    config.llm.temperature,
                    config.llm.max_tokens,
                )))
            }
            None => {
                info!("No LLM key configured; running cache/fallback only");
                None
            }
        };

        let search = provider_from_config(&config.search);

        let limiter = Arc::new(RateLimiter::new(
            config.limits.diagnosis.max_requests,
            config.limits.diagnosis.window(),
        ));

        Self::new(store, llm, search, limiter)
    }

    /// The diagnosis limiter, for starting its sweeper alongside the
    /// server.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    /// Whether an LLM tier is active (health reporting).
    pub fn llm_configured(&self) -> bool {
        self.llm.is_some()
    }

    /// Name of the active search provider, if any (health reporting).
    pub fn search_provider(&self) -> Option<&'static str> {
        self.search.as_ref().map(|provider| provider.name())
    }

    /// Diagnose one reported fault.
    ///
    /// The only error returns are the two pre-flight gates, both before
    /// any external side effect. Past them, every upstream failure
    /// degrades to the next tier and the call yields a result.
    pub async fn diagnose(
        &self,
        request: &DiagnosisRequest,
    ) -> Result<DiagnosisResult, DiagnoseError> {
        sanitize::validate(request)?;
        let sanitized = SanitizedRequest::from_request(request);

        match self.limiter.check_and_consume(&sanitized.email) {
            RateLimitDecision::Allowed => {}
            RateLimitDecision::Limited { retry_after } => {
                debug!(email = %sanitized.email, "Rate limit exceeded");
                return Err(DiagnoseError::RateLimited {
                    retry_after_secs: retry_after.as_secs(),
                });
            }
        }

        let error_code = detect_error_code(&sanitized.problem);
        info!(
            appliance = %sanitized.appliance,
            brand = %sanitized.brand,
            error_code = error_code.as_deref().unwrap_or("none"),
            "Diagnosing"
        );

        let result = self.run_pipeline(&sanitized, error_code.as_deref()).await;
        Ok(result)
    }

    /// The post-preflight tier chain. Infallible by construction.
    async fn run_pipeline(
        &self,
        sanitized: &SanitizedRequest,
        error_code: Option<&str>,
    ) -> DiagnosisResult {
        let outcome = cache::lookup(
            self.store.as_ref(),
            &sanitized.appliance,
            &sanitized.brand,
            &sanitized.problem,
            error_code,
        )
        .await;

        if let CacheOutcome::Hit(result) = outcome {
            // Cache hits skip search and the LLM entirely.
            self.persist(sanitized, &result, error_code, true).await;
            return *result;
        }

        let Some(llm) = &self.llm else {
            debug!("No LLM configured; using fallback");
            let result = fallback_diagnosis(
                &sanitized.appliance,
                &sanitized.brand,
                &sanitized.problem,
            );
            self.persist(sanitized, &result, error_code, false).await;
            return result;
        };

        let enrichment = self.enrich(sanitized, error_code).await;

        let prompt = build_diagnosis_prompt(
            &sanitized.appliance,
            &sanitized.brand,
            &sanitized.problem,
            error_code,
            enrichment.as_ref(),
        );

        let result = match llm.complete(&prompt).await {
            Ok(raw) => {
                debug!(reply_len = raw.len(), "LLM reply received");
                let ctx = ParseContext {
                    appliance: &sanitized.appliance,
                    brand: &sanitized.brand,
                    error_code,
                };
                let parsed = parse_diagnosis(&raw, &ctx);
                match &enrichment {
                    Some(enrichment) => parsed.with_source_urls(&enrichment.source_urls),
                    None => parsed,
                }
            }
            Err(e) => {
                warn!(error = %e, "LLM diagnosis failed; using fallback");
                fallback_diagnosis(&sanitized.appliance, &sanitized.brand, &sanitized.problem)
            }
        };

        self.persist(sanitized, &result, error_code, false).await;
        result
    }

    /// Gather web context when a code was detected and a provider is
    /// configured; anything else (including every search failure) means
    /// the LLM runs without enrichment.
    async fn enrich(
        &self,
        sanitized: &SanitizedRequest,
        error_code: Option<&str>,
    ) -> Option<Enrichment> {
        let code = error_code?;
        let provider = self.search.as_deref()?;
        gather_enrichment(provider, &sanitized.appliance, &sanitized.brand, code).await
    }

    /// Record the attempt. Failure here never blocks the response.
    async fn persist(
        &self,
        sanitized: &SanitizedRequest,
        result: &DiagnosisResult,
        error_code: Option<&str>,
        was_cached: bool,
    ) {
        let record = DiagnosisRecord::from_result(sanitized, result, error_code, was_cached);
        if let Err(e) = self.store.insert(&record).await {
            warn!(error = %e, "Failed to persist diagnosis; continuing");
        }
    }
}
