use serenity::all::Role;

use crate::{data::Context, platform::SHORT_NOTICE, utils};

super::command! {
    /// Restrict entry to members holding this role (or any other added role)
    pub async fn add_role(
        ctx: Context<'_>,
        #[description = "The role, by mention, ID or name"]
        role: Role
    ) -> Result<()> {
        let Some(mut state) = super::operator_state(ctx).await? else {
            return Ok(());
        };

        let added = state.add_eligible_role(role.id, role.name.clone());
        let eligible = state.config().eligible_roles.len();
        drop(state);

        if added {
            info!(role = %role.name, eligible, "eligible role added");
        } else {
            trace!(role = %role.name, "role is already eligible");
        }

        utils::transient_text(ctx, "✅ Done.", SHORT_NOTICE).await
    }
}
