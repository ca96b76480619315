use crate::{data::Context, platform::SHORT_NOTICE, utils};

super::command! {
    /// Stop letting members enter because of this role
    pub async fn remove_role(
        ctx: Context<'_>,
        #[description = "The role, by mention, ID or name (works for deleted roles too)"]
        #[rest]
        role: String
    ) -> Result<()> {
        let Some(mut state) = super::operator_state(ctx).await? else {
            return Ok(());
        };

        // looked up among the eligible roles, so deleted roles can still be removed
        let role_id = state.config().eligible_roles.find(&role);
        let removed = match role_id {
            Some(role_id) => state.remove_eligible_role(role_id),
            None => false,
        };
        drop(state);

        if !removed {
            return utils::transient_text(
                ctx,
                format!("ℹ️ **{}** is not an eligible role.", role.trim()),
                SHORT_NOTICE,
            )
            .await;
        }

        info!(%role, "eligible role removed");

        utils::transient_text(ctx, "✅ Done.", SHORT_NOTICE).await
    }
}
