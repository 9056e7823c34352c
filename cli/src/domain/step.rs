//! Provisioning workflow steps

/// Individual steps of the provisioning flow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    /// Create the D1 database
    CreateDatabase,
    /// Rewrite the D1 binding in wrangler.toml
    UpdateConfig,
    /// Apply schema.sql to the remote database
    ApplySchema,
    /// Deploy the worker
    Deploy,
    /// Store the bot token as a worker secret
    StoreSecret,
    /// Register the Telegram webhook
    RegisterWebhook,
    /// Print the Group Privacy reminder
    Reminder,
}

impl ProvisionStep {
    pub const ALL: [ProvisionStep; 7] = [
        Self::CreateDatabase,
        Self::UpdateConfig,
        Self::ApplySchema,
        Self::Deploy,
        Self::StoreSecret,
        Self::RegisterWebhook,
        Self::Reminder,
    ];

    /// 1-based position in the flow
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|step| step == self)
            .map_or(0, |idx| idx + 1)
    }

    /// Get human-readable name for the step
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateDatabase => "Create D1 database",
            Self::UpdateConfig => "Update wrangler.toml",
            Self::ApplySchema => "Create database tables",
            Self::Deploy => "Deploy worker",
            Self::StoreSecret => "Set bot token",
            Self::RegisterWebhook => "Set webhook",
            Self::Reminder => "Group Privacy",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::CreateDatabase => "🗃️",
            Self::UpdateConfig => "📝",
            Self::ApplySchema => "🧱",
            Self::Deploy => "🚀",
            Self::StoreSecret => "🔐",
            Self::RegisterWebhook => "🪝",
            Self::Reminder => "📣",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_numbered_in_order() {
        let numbers: Vec<usize> = ProvisionStep::ALL.iter().map(|s| s.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_webhook_runs_before_reminder() {
        assert!(ProvisionStep::RegisterWebhook.number() < ProvisionStep::Reminder.number());
        assert_eq!(ProvisionStep::Reminder.number(), ProvisionStep::ALL.len());
    }
}
