//! Per-execution state

use crate::config::ExecutorConfig;
use crate::core::error::ExecutionError;
use crate::core::path::FieldPath;

/// State owned by one in-flight execution
///
/// Tracks the path of the field being executed, which gives errors
/// their location and bounds the nesting depth.
pub(crate) struct ExecutionContext<'a> {
    config: &'a ExecutorConfig,
    path: FieldPath,
}

impl<'a> ExecutionContext<'a> {
    pub(crate) fn new(config: &'a ExecutorConfig) -> Self {
        Self {
            config,
            path: FieldPath::root(),
        }
    }

    pub(crate) fn path(&self) -> &FieldPath {
        &self.path
    }

    pub(crate) fn typename_key(&self) -> &str {
        &self.config.typename_key
    }

    /// Step into the field writing `key`
    ///
    /// Must be paired with [`leave`](Self::leave), including when the
    /// depth check fails.
    pub(crate) fn enter(&mut self, key: &str) -> Result<(), ExecutionError> {
        self.path.push_key(key);
        self.check_depth()
    }

    /// Step into a list element
    ///
    /// Nested lists count toward the depth limit like keys do.
    pub(crate) fn enter_index(&mut self, index: usize) -> Result<(), ExecutionError> {
        self.path.push_index(index);
        self.check_depth()
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }

    fn check_depth(&self) -> Result<(), ExecutionError> {
        if self.path.depth() > self.config.max_depth {
            return Err(ExecutionError::DepthLimitExceeded {
                max_depth: self.config.max_depth,
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}
