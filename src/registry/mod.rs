//! Agent tool registry.
//!
//! An explicit registration table mapping operation names to JSON-schema
//! descriptors and handlers. The table is built once at startup with
//! [`ToolRegistry::builder`]; argument structs derive
//! [`schemars::JsonSchema`], so the schema handed to the agent runtime and
//! the validation applied to incoming arguments come from the same type.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::traits::Account;

/// Uniform result of a tool invocation.
///
/// This is the only shape that crosses the tool boundary; failures are
/// reported here rather than as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub success: bool,
    pub message: String,
}

impl ToolOutcome {
    /// A successful outcome carrying a message for the user.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// A failed outcome carrying a human-readable error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

type ToolHandler = Arc<dyn Fn(Arc<dyn Account>, Value) -> BoxFuture<'static, ToolOutcome> + Send + Sync>;

/// One registered, agent-callable operation.
pub struct ToolDescriptor {
    name: String,
    description: String,
    parameters: Value,
    requires_account: bool,
    handler: ToolHandler,
}

impl ToolDescriptor {
    /// Registered operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description handed to the agent runtime.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// JSON schema of the argument object.
    pub fn parameters(&self) -> &Value {
        &self.parameters
    }

    /// Whether the handler needs a bound signing account.
    pub fn requires_account(&self) -> bool {
        self.requires_account
    }

    /// Parses `args` against the argument schema and runs the handler.
    ///
    /// Malformed arguments yield a failed outcome; nothing panics across this
    /// boundary.
    pub async fn invoke(&self, account: Arc<dyn Account>, args: Value) -> ToolOutcome {
        debug!(tool = %self.name, event = "tool_invoked");
        (self.handler)(account, args).await
    }
}

impl fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("requires_account", &self.requires_account)
            .finish_non_exhaustive()
    }
}

/// Table of agent-callable operations, keyed by name.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolRegistry {
    /// Starts building a registry.
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    /// Looks up a tool by name.
    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.get(name)
    }

    /// Iterates the registered tools in name order.
    pub fn iter(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.values()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Builder assembling the registration table at startup.
#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    tools: BTreeMap<String, ToolDescriptor>,
}

impl ToolRegistryBuilder {
    /// Registers an operation under `name`.
    ///
    /// The argument type supplies both the JSON schema (via
    /// [`schemars::JsonSchema`]) and the validation applied before `handler`
    /// runs. Registering the same name twice keeps the later registration.
    pub fn register<Args, F, Fut>(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        handler: F,
    ) -> Self
    where
        Args: DeserializeOwned + JsonSchema + Send + 'static,
        F: Fn(Arc<dyn Account>, Args) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = ToolOutcome> + Send + 'static,
    {
        let name = name.into();
        let parameters = serde_json::to_value(schemars::schema_for!(Args)).unwrap_or_default();

        let erased: ToolHandler = Arc::new(move |account, value| {
            match serde_json::from_value::<Args>(value) {
                Ok(args) => {
                    let fut: BoxFuture<'static, ToolOutcome> = Box::pin(handler(account, args));
                    fut
                }
                Err(parse) => {
                    let outcome = ToolOutcome::error(format!("Invalid arguments: {parse}"));
                    Box::pin(std::future::ready(outcome))
                }
            }
        });

        self.tools.insert(
            name.clone(),
            ToolDescriptor {
                name,
                description: description.into(),
                parameters,
                requires_account: true,
                handler: erased,
            },
        );
        self
    }

    /// Finalizes the table.
    pub fn build(self) -> ToolRegistry {
        ToolRegistry { tools: self.tools }
    }
}
