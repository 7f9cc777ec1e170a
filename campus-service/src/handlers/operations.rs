//! The nine prompt operations.
//!
//! Every operation runs the same pipeline: validate the body, render the
//! operation's template, ask the completion provider, and wrap the text
//! under the operation's result key.

use axum::{
    extract::State,
    routing::{post, MethodRouter},
    Json, Router,
};
use serde::de::DeserializeOwned;
use service_core::error::AppError;
use std::collections::BTreeMap;
use std::time::Instant;

use crate::dtos::{
    DoubtRequest, ExplanationRequest, HomeworkRequest, LessonRequest, ParentMessageRequest,
    PerformanceRequest, PromptRequest, ReportRequest, SyllabusRequest,
};
use crate::services::metrics::metrics;
use crate::startup::AppState;
use crate::templates::{Operation, TemplateError, TemplateRegistry};
use crate::utils::ValidatedJson;

/// Single-key JSON object wrapping the generated text.
pub type ResultEnvelope = BTreeMap<&'static str, String>;

#[tracing::instrument(skip_all, fields(operation = %operation))]
pub async fn dispatch<R: PromptRequest>(
    state: &AppState,
    operation: Operation,
    request: R,
) -> Result<Json<ResultEnvelope>, AppError> {
    let prompt = state
        .templates
        .render(operation.name(), &request.into_fields())
        .inspect_err(|_| metrics().record_completion(operation.name(), "template_error", 0.0))?;

    tracing::debug!(prompt_len = prompt.len(), "Rendered prompt");

    let started = Instant::now();
    let result = state
        .provider
        .complete(&prompt, state.config.temperature)
        .await;
    let elapsed = started.elapsed().as_secs_f64();

    match result {
        Ok(text) => {
            metrics().record_completion(operation.name(), "success", elapsed);
            tracing::info!(
                provider = state.provider.name(),
                completion_len = text.len(),
                elapsed_ms = (elapsed * 1000.0) as u64,
                "Completion succeeded"
            );
            Ok(Json(BTreeMap::from([(operation.result_key(), text)])))
        }
        Err(e) => {
            metrics().record_completion(operation.name(), e.kind(), elapsed);
            tracing::error!(
                provider = state.provider.name(),
                error = %e,
                "Completion failed"
            );
            Err(e.into())
        }
    }
}

/// POST route for `operation`, after checking that its template asks for
/// exactly the fields `R` supplies.
pub fn operation_route<R>(
    templates: &TemplateRegistry,
    operation: Operation,
) -> Result<MethodRouter<AppState>, TemplateError>
where
    R: PromptRequest + DeserializeOwned,
{
    templates
        .get(operation.name())?
        .ensure_placeholders(R::FIELDS)?;

    Ok(post(
        move |State(state): State<AppState>, ValidatedJson(request): ValidatedJson<R>| async move {
            dispatch(&state, operation, request).await
        },
    ))
}

/// Router with one POST route per [`Operation`].
pub fn routes(templates: &TemplateRegistry) -> Result<Router<AppState>, TemplateError> {
    let mut router = Router::new();

    for operation in Operation::ALL {
        let route = match operation {
            Operation::GenerateLesson | Operation::GenerateQuiz => {
                operation_route::<LessonRequest>(templates, operation)?
            }
            Operation::SolveDoubt => operation_route::<DoubtRequest>(templates, operation)?,
            Operation::ExplainConcept => {
                operation_route::<ExplanationRequest>(templates, operation)?
            }
            Operation::SummarizeReport => operation_route::<ReportRequest>(templates, operation)?,
            Operation::ParentMessage => {
                operation_route::<ParentMessageRequest>(templates, operation)?
            }
            Operation::SyllabusPlanner => {
                operation_route::<SyllabusRequest>(templates, operation)?
            }
            Operation::GenerateHomework => {
                operation_route::<HomeworkRequest>(templates, operation)?
            }
            Operation::StudentAnalysis => {
                operation_route::<PerformanceRequest>(templates, operation)?
            }
        };
        router = router.route(&operation.path(), route);
    }

    Ok(router)
}
