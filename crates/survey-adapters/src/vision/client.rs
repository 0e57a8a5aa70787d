//! Cliente de visión: la llamada cruda al modelo.
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VisionClientError {
    #[error("vision backend: {0}")] Backend(String),
}

/// Una petición de análisis: prompts ya armados más la imagen.
#[derive(Debug, Clone, Copy)]
pub struct VisionRequest<'a> {
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    pub image: &'a [u8],
    pub content_type: &'a str,
}

/// Llamada opaca al modelo de visión. Devuelve el texto crudo de la
/// respuesta; el armado de prompts y la interpretación viven fuera.
#[async_trait]
pub trait VisionClient: Send + Sync {
    async fn complete(&self, request: VisionRequest<'_>) -> Result<String, VisionClientError>;
}

/// Cliente simulado para pruebas y demostración: entrega respuestas
/// pre-cargadas en orden y repite la última cuando se agotan.
#[derive(Default)]
pub struct MockVisionClient {
    responses: Mutex<VecDeque<String>>,
    fallback: Option<String>,
    calls: AtomicUsize,
}

impl MockVisionClient {
    /// Responde siempre el mismo texto.
    pub fn always(response: impl Into<String>) -> Self {
        Self { responses: Mutex::new(VecDeque::new()),
               fallback: Some(response.into()),
               calls: AtomicUsize::new(0) }
    }

    /// Responde los textos dados en orden; al agotarse repite el último.
    pub fn scripted<I, T>(responses: I) -> Self
        where I: IntoIterator<Item = T>,
              T: Into<String>
    {
        let queue: VecDeque<String> = responses.into_iter().map(Into::into).collect();
        let fallback = queue.back().cloned();
        Self { responses: Mutex::new(queue), fallback, calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionClient for MockVisionClient {
    async fn complete(&self, _request: VisionRequest<'_>) -> Result<String, VisionClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut queue = self.responses.lock().expect("mock vision queue poisoned");
        if queue.len() > 1 {
            return Ok(queue.pop_front().expect("non-empty queue"));
        }
        queue.pop_front()
             .or_else(|| self.fallback.clone())
             .ok_or_else(|| VisionClientError::Backend("mock has no scripted response".to_string()))
    }
}
