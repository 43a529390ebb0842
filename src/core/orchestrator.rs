//! Priority-ordered provider fallback
//!
//! Lyrics sources and translators share one algorithm: try every available
//! provider in ascending priority until one returns a non-empty result. The
//! [`Orchestrator`] implements that once and is instantiated by
//! `SourceManager` and `TranslationManager`.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{OrchestrationError, ProviderError};

/// A successful provider answer that may still be empty.
pub trait Payload {
    fn is_empty_payload(&self) -> bool;
}

impl Payload for String {
    fn is_empty_payload(&self) -> bool {
        self.trim().is_empty()
    }
}

#[async_trait]
pub trait Provider: Send + Sync {
    type Request: Send + Sync;
    type Output: Payload + Send;

    fn name(&self) -> &str;

    /// Lower values are tried first.
    fn priority(&self) -> u32;

    /// Fixed when the provider is constructed.
    fn is_available(&self) -> bool {
        true
    }

    async fn attempt(&self, request: &Self::Request) -> Result<Self::Output, ProviderError>;
}

pub type SharedProvider<Req, Out> = Arc<dyn Provider<Request = Req, Output = Out>>;

/// Name, priority and availability of a provider, for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub name: String,
    pub priority: u32,
    pub is_available: bool,
}

/// The provider that answered and what it returned.
#[derive(Debug, Clone, PartialEq)]
pub struct Selected<T> {
    pub provider: String,
    pub output: T,
}

/// Runs a fixed, priority-ordered list of providers. `P` is usually a trait
/// object such as `dyn Provider<Request = R, Output = T>` or a subtrait of it.
pub struct Orchestrator<P: ?Sized> {
    providers: Vec<Arc<P>>,
    excluded: Vec<ProviderDescriptor>,
}

impl<P> Orchestrator<P>
where
    P: Provider + ?Sized,
{
    /// Drops unavailable providers and orders the rest by priority. The sort
    /// is stable, so providers sharing a priority keep their insertion order.
    pub fn new(candidates: Vec<Arc<P>>) -> Self {
        let (mut providers, unavailable): (Vec<_>, Vec<_>) =
            candidates.into_iter().partition(|p| p.is_available());

        let excluded = unavailable.iter().map(|p| describe(p.as_ref())).collect::<Vec<_>>();
        for skipped in &excluded {
            debug!("Provider {} is not available, excluding it", skipped.name);
        }

        providers.sort_by_key(|p| p.priority());

        Self { providers, excluded }
    }

    pub fn names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    /// Available providers in order, followed by the excluded ones.
    pub fn descriptors(&self) -> Vec<ProviderDescriptor> {
        self.providers
            .iter()
            .map(|p| describe(p.as_ref()))
            .chain(self.excluded.iter().cloned())
            .collect()
    }

    pub fn primary(&self) -> Option<&Arc<P>> {
        self.providers.first()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Try each provider once, in order, returning the first non-empty answer.
    pub async fn run(&self, request: &P::Request) -> Result<Selected<P::Output>, OrchestrationError> {
        for provider in &self.providers {
            debug!("Trying {}...", provider.name());

            match provider.attempt(request).await {
                Ok(output) if !output.is_empty_payload() => {
                    info!("{} succeeded", provider.name());
                    return Ok(Selected {
                        provider: provider.name().to_string(),
                        output,
                    });
                }
                Ok(_) => debug!("{} returned an empty result", provider.name()),
                Err(e) => debug!("{} failed: {}", provider.name(), e),
            }
        }

        Err(OrchestrationError::Exhausted {
            attempted: self.providers.len(),
        })
    }

    /// Invoke only the provider called `name` (case-insensitive).
    pub async fn dispatch(
        &self,
        name: &str,
        request: &P::Request,
    ) -> Result<Selected<P::Output>, OrchestrationError> {
        let provider = self
            .providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| OrchestrationError::UnknownProvider(name.to_string()))?;

        match provider.attempt(request).await {
            Ok(output) if !output.is_empty_payload() => Ok(Selected {
                provider: provider.name().to_string(),
                output,
            }),
            Ok(_) => Err(OrchestrationError::Failed {
                provider: provider.name().to_string(),
                source: ProviderError::ExtractionMiss("empty result".to_string()),
            }),
            Err(source) => Err(OrchestrationError::Failed {
                provider: provider.name().to_string(),
                source,
            }),
        }
    }
}

fn describe<P: Provider + ?Sized>(provider: &P) -> ProviderDescriptor {
    ProviderDescriptor {
        name: provider.name().to_string(),
        priority: provider.priority(),
        is_available: provider.is_available(),
    }
}
