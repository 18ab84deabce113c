//! Minimal LDAP listener for the in-memory directory.
//!
//! Serves simple bind, search, whoami and unbind so code under test can talk
//! to the fixture data over a real socket. Writes are not accepted over the
//! wire; fixtures are loaded through [`DirectoryServer`](super::DirectoryServer).

use super::InMemoryDirectoryServer;
use super::dn;
use crate::entry::{Attribute, DirectoryEntry};
use futures::{SinkExt, StreamExt};
use ldap3_proto::LdapCodec;
use ldap3_proto::proto::{
    LdapFilter, LdapMsg, LdapPartialAttribute, LdapResultCode, LdapSearchResultEntry,
    LdapSearchScope,
};
use ldap3_proto::simple::{SearchRequest, ServerOps, SimpleBindRequest, WhoamiRequest};
use log::{debug, warn};
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tokio_util::codec::{FramedRead, FramedWrite};

/// Accept connections until the task is aborted.
pub(crate) async fn serve(listener: TcpListener, server: InMemoryDirectoryServer) {
    let mut connections = JoinSet::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((socket, peer)) => {
                    connections.spawn(handle_connection(socket, peer, server.clone()));
                }
                Err(e) => warn!("Failed to accept LDAP connection: {}", e),
            },
            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }
}

async fn handle_connection(socket: TcpStream, peer: SocketAddr, server: InMemoryDirectoryServer) {
    debug!("LDAP connection from {}", peer);
    let (r, w) = socket.into_split();
    let mut requests = FramedRead::new(r, LdapCodec::default());
    let mut responses = FramedWrite::new(w, LdapCodec::default());
    let mut session = Session::new(server);

    while let Some(msg) = requests.next().await {
        let Some(op) = msg.ok().and_then(|msg| ServerOps::try_from(msg).ok()) else {
            debug!("Closing connection from {}: unsupported request", peer);
            break;
        };

        #[allow(unreachable_patterns)]
        let replies = match op {
            ServerOps::SimpleBind(req) => vec![session.bind(&req)],
            ServerOps::Search(req) => session.search(&req).await,
            ServerOps::Whoami(req) => vec![session.whoami(&req)],
            ServerOps::Unbind(_) => break,
            _ => {
                debug!("Closing connection from {}: operation not served", peer);
                break;
            }
        };

        for reply in replies {
            if responses.send(reply).await.is_err() {
                return;
            }
        }
        if responses.flush().await.is_err() {
            return;
        }
    }
    debug!("LDAP connection from {} closed", peer);
}

struct Session {
    server: InMemoryDirectoryServer,
    bound_dn: Option<String>,
}

impl Session {
    fn new(server: InMemoryDirectoryServer) -> Self {
        Self {
            server,
            bound_dn: None,
        }
    }

    fn bind(&mut self, req: &SimpleBindRequest) -> LdapMsg {
        if req.dn.is_empty() && req.pw.is_empty() {
            self.bound_dn = None;
            req.gen_success()
        } else if self.server.config().accepts(&req.dn, &req.pw) {
            debug!("Bound as '{}'", req.dn);
            self.bound_dn = Some(req.dn.clone());
            req.gen_success()
        } else {
            debug!("Rejected bind for '{}'", req.dn);
            req.gen_invalid_cred()
        }
    }

    fn whoami(&self, req: &WhoamiRequest) -> LdapMsg {
        match &self.bound_dn {
            Some(bound) => req.gen_success(&format!("dn: {}", bound)),
            None => req.gen_success(""),
        }
    }

    async fn search(&self, req: &SearchRequest) -> Vec<LdapMsg> {
        let base = dn::normalize(&req.base);
        let entries = self.server.all_entries().await;

        if !base.is_empty() && !entries.iter().any(|e| dn::normalize(e.dn()) == base) {
            return vec![req.gen_error(
                LdapResultCode::NoSuchObject,
                format!("No such entry: {}", req.base),
            )];
        }

        let mut replies: Vec<LdapMsg> = entries
            .iter()
            .filter(|entry| in_scope(&dn::normalize(entry.dn()), &base, &req.scope))
            .filter(|entry| matches_filter(entry, &req.filter))
            .map(|entry| req.gen_result_entry(to_result_entry(entry, &req.attrs)))
            .collect();
        debug!("Search under '{}' returned {} entries", req.base, replies.len());
        replies.push(req.gen_success());
        replies
    }
}

fn in_scope(entry_dn: &str, base: &str, scope: &LdapSearchScope) -> bool {
    #[allow(unreachable_patterns)]
    match scope {
        LdapSearchScope::Base => entry_dn == base,
        LdapSearchScope::OneLevel => dn::parent(entry_dn).as_deref().unwrap_or("") == base,
        LdapSearchScope::Subtree => dn::is_within(entry_dn, base),
        _ => dn::is_within(entry_dn, base) && entry_dn != base,
    }
}

fn matches_filter(entry: &DirectoryEntry, filter: &LdapFilter) -> bool {
    match filter {
        LdapFilter::And(filters) => filters.iter().all(|f| matches_filter(entry, f)),
        LdapFilter::Or(filters) => filters.iter().any(|f| matches_filter(entry, f)),
        LdapFilter::Not(inner) => !matches_filter(entry, inner),
        LdapFilter::Present(name) => {
            name.eq_ignore_ascii_case("objectClass") || find(entry, name).next().is_some()
        }
        LdapFilter::Equality(name, value) => find(entry, name)
            .flat_map(|a| a.string_values())
            .any(|v| v.eq_ignore_ascii_case(value)),
        _ => false,
    }
}

fn find<'a>(entry: &'a DirectoryEntry, name: &'a str) -> impl Iterator<Item = &'a Attribute> {
    entry.attributes().iter().filter(move |a| a.is_named(name))
}

fn to_result_entry(entry: &DirectoryEntry, requested: &[String]) -> LdapSearchResultEntry {
    let all = requested.is_empty() || requested.iter().any(|a| a == "*");
    LdapSearchResultEntry {
        dn: entry.dn().to_string(),
        attributes: entry
            .attributes()
            .iter()
            .filter(|a| all || requested.iter().any(|r| a.is_named(r)))
            .map(|a| LdapPartialAttribute {
                atype: a.name().to_string(),
                vals: a.values().to_vec(),
            })
            .collect(),
    }
}
