use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

const ROLE: Symbol = symbol_short!("ROLE");

/// Privileged roles a contract can hand out.
///
/// Each role has exactly one holder, fixed when the contract is set up.
#[contracttype]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Role {
    /// May run one-off administrative operations.
    Admin,
    /// The single gateway allowed to mutate positions.
    Controller,
}

fn role_key(role: Role) -> (Symbol, Role) {
    (ROLE, role)
}

/// Records `holder` as the sole holder of `role`.
pub fn assign_role(env: &Env, role: Role, holder: &Address) {
    env.storage().instance().set(&role_key(role), holder);
}

/// Returns the holder of `role`, if one was assigned.
pub fn role_holder(env: &Env, role: Role) -> Option<Address> {
    env.storage().instance().get(&role_key(role))
}

/// Returns whether `address` holds `role`.
///
/// An unassigned role is held by nobody.
pub fn has_role(env: &Env, role: Role, address: &Address) -> bool {
    role_holder(env, role).is_some_and(|holder| holder == *address)
}

/// Authenticates `caller` and checks it holds `role`.
///
/// Auth failures trap in the host; a missing role is reported as `false` so
/// each contract can map it onto its own error type.
pub fn require_role(env: &Env, role: Role, caller: &Address) -> bool {
    caller.require_auth();
    has_role(env, role, caller)
}
