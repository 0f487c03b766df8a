//! Engine chain for composing multiple template dialects.
//!
//! The [`EngineChain`] tries its engines in order until one knows the view.

use std::fmt;

use super::{RenderContext, TemplateEngine};
use crate::error::ViewError;

/// Chain multiple engines with fallback behavior.
///
/// Engines are tried in the order they were added. The first engine that does
/// not report [`ViewError::ViewNotFound`] wins, whether it succeeds or fails
/// hard. If every engine reports not-found, so does the chain.
///
/// # Example
///
/// ```ignore
/// use standout_view::{EngineChain, EnvironmentEngine, FileEngine, View};
///
/// // Plain .jinja files first, then embedded templates
/// let chain = EngineChain::new()
///     .with_engine(FileEngine::new(dirs))
///     .with_engine(EnvironmentEngine::new(embedded_env));
///
/// let view = View::new(chain);
/// ```
#[derive(Default)]
pub struct EngineChain {
    engines: Vec<Box<dyn TemplateEngine>>,
}

impl EngineChain {
    /// Create a new empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an engine to the chain.
    ///
    /// Engines are tried in the order they are added.
    pub fn with_engine<E: TemplateEngine + 'static>(mut self, engine: E) -> Self {
        self.engines.push(Box::new(engine));
        self
    }

    /// Add an engine to an existing chain.
    pub fn push<E: TemplateEngine + 'static>(&mut self, engine: E) -> &mut Self {
        self.engines.push(Box::new(engine));
        self
    }

    /// Number of engines in the chain.
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Returns true if the chain has no engines.
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl fmt::Debug for EngineChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineChain")
            .field("engines", &self.engines.len())
            .finish()
    }
}

impl TemplateEngine for EngineChain {
    fn render(&self, view: &str, context: &RenderContext) -> Result<String, ViewError> {
        for (index, engine) in self.engines.iter().enumerate() {
            match engine.render(view, context) {
                Err(err) if err.is_not_found() => {
                    tracing::debug!(view, engine = index, "engine has no such view, trying next");
                }
                result => return result,
            }
        }

        Err(context.not_found(view))
    }

    fn exists(&self, view: &str) -> bool {
        self.engines.iter().any(|engine| engine.exists(view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::View;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Engine knowing a fixed set of views, counting render calls.
    struct Fixed {
        views: Vec<(&'static str, Result<&'static str, ViewError>)>,
        calls: Arc<AtomicUsize>,
    }

    impl Fixed {
        fn new(views: Vec<(&'static str, Result<&'static str, ViewError>)>) -> Self {
            Self {
                views,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl TemplateEngine for Fixed {
        fn render(&self, view: &str, context: &RenderContext) -> Result<String, ViewError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.views.iter().find(|(name, _)| *name == view) {
                Some((_, Ok(out))) => Ok(out.to_string()),
                Some((_, Err(err))) => Err(err.clone()),
                None => Err(context.not_found(view)),
            }
        }

        fn exists(&self, view: &str) -> bool {
            self.views.iter().any(|(name, _)| *name == view)
        }
    }

    fn context() -> RenderContext {
        let mut data = crate::DataMap::new();
        data.insert("k".into(), serde_json::json!("v"));
        RenderContext::new(data, View::new(EngineChain::new()))
    }

    #[test]
    fn test_first_match_wins() {
        let chain = EngineChain::new()
            .with_engine(Fixed::new(vec![("a", Ok("first"))]))
            .with_engine(Fixed::new(vec![("a", Ok("second")), ("b", Ok("only"))]));

        assert_eq!(chain.render("a", &context()).unwrap(), "first");
        assert_eq!(chain.render("b", &context()).unwrap(), "only");
        assert_eq!(chain.len(), 2);
    }

    #[test]
    fn test_hard_error_stops_chain() {
        let second = Fixed::new(vec![("a", Ok("second"))]);
        let calls = second.calls.clone();
        let chain = EngineChain::new()
            .with_engine(Fixed::new(vec![("a", Err(ViewError::Template("boom".into())))]))
            .with_engine(second);

        assert!(matches!(
            chain.render("a", &context()),
            Err(ViewError::Template(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_missing_reports_view_and_data() {
        let mut chain = EngineChain::new();
        chain.push(Fixed::new(vec![])).push(Fixed::new(vec![]));

        match chain.render("x", &context()) {
            Err(ViewError::ViewNotFound { view, data }) => {
                assert_eq!(view, "x");
                assert_eq!(data["k"], "v");
            }
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_chain() {
        let chain = EngineChain::new();
        assert!(chain.is_empty());
        assert!(chain.render("x", &context()).unwrap_err().is_not_found());
        assert!(!chain.exists("x"));
    }

    #[test]
    fn test_exists_any() {
        let chain = EngineChain::new()
            .with_engine(Fixed::new(vec![("a", Ok(""))]))
            .with_engine(Fixed::new(vec![("b", Ok(""))]));

        assert!(chain.exists("a"));
        assert!(chain.exists("b"));
        assert!(!chain.exists("c"));
    }
}
