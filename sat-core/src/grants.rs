//! Grant matching: turning payload grants into capabilities.

use crate::types::{Capabilities, GrantEntry, GrantMatcher};

/// Action name that allows creating conversations and inviting participants.
pub const INVITE_ACTION: &str = "invite";
/// Action name that allows listening for incoming invites.
pub const LISTEN_ACTION: &str = "listen";

/// Extract the address from a `<scheme>:<address>@...` resource.
///
/// The address runs from the end of the scheme prefix to the last `@` on the
/// first line of the resource, so `sip:a@b@host` yields `a@b`. An empty
/// address (`sip:@host`) is still a match.
pub fn resource_address<'a>(res: &'a str, scheme: &str) -> Option<&'a str> {
    let rest = res.strip_prefix(scheme)?.strip_prefix(':')?;
    let line_end = rest
        .find(|c: char| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
        .unwrap_or(rest.len());
    let line = &rest[..line_end];
    line.rfind('@').map(|at| &line[..at])
}

/// The default matcher: `sip:` resources carrying `invite`/`listen` actions.
#[derive(Debug, Clone, Copy, Default)]
pub struct SipGrantMatcher;

impl GrantMatcher for SipGrantMatcher {
    fn match_grant(&self, grant: &GrantEntry) -> Option<Capabilities> {
        let address = resource_address(&grant.res, "sip")?;
        Some(Capabilities {
            address: address.to_string(),
            can_invite: grant.allows(INVITE_ACTION),
            can_listen: grant.allows(LISTEN_ACTION),
        })
    }
}

/// Walk the grants in order and keep the capabilities of the last match.
pub fn derive_capabilities<M>(grants: &[GrantEntry], matcher: &M) -> Option<Capabilities>
where
    M: GrantMatcher + ?Sized,
{
    grants
        .iter()
        .filter_map(|grant| matcher.match_grant(grant))
        .last()
}
