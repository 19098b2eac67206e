//! Handler registry: wires every controller to its handler name.

use crate::dispatcher::Dispatcher;
use crate::handlers::*;

/// Register every handler under the name the route table dispatches to.
///
/// # Safety
///
/// Calls [`Dispatcher::register_typed`], which spawns a coroutine per
/// handler. The caller must ensure the may runtime is initialized first.
pub unsafe fn register_all(dispatcher: &mut Dispatcher) {
    unsafe {
        dispatcher.register_typed("get_root", get_root::GetRootController);
        dispatcher.register_typed("post_root", post_root::PostRootController);
        dispatcher.register_typed("put_root", put_root::PutRootController);
        dispatcher.register_typed("list_users", list_users::ListUsersController);
        dispatcher.register_typed("list_all_users", list_all_users::ListAllUsersController);
        dispatcher.register_typed("current_user", current_user::CurrentUserController);
        dispatcher.register_typed("get_user", get_user::GetUserController);
        dispatcher.register_typed("user_access", user_access::UserAccessController);
        dispatcher.register_typed(
            "list_player_items",
            list_player_items::ListPlayerItemsController,
        );
        dispatcher.register_typed("get_player_item", get_player_item::GetPlayerItemController);
        dispatcher.register_typed(
            "get_user_player_item",
            get_user_player_item::GetUserPlayerItemController,
        );
        dispatcher.register_typed("create_user", create_user::CreateUserController);
        dispatcher.register_typed("update_user", update_user::UpdateUserController);
        dispatcher.register_typed("hidden_users", hidden_users::HiddenUsersController);
        dispatcher.register_typed("update_item", update_item::UpdateItemController);
    }
}
