//! Namespace scope stack (Namespaces in XML 1.0 Section 6.1, 6.2).
//!
//! Prefix→URI-Bindings gelten pro Element-Tiefe und fuer alle Nachfahren,
//! solange sie nicht geschattet werden. Jeder `push` kopiert den Snapshot des
//! Elternscopes und wendet die anstehenden Deklarationen an; `pop` verwirft
//! nur die Ebene selbst und stellt die Elternsicht exakt wieder her.
//!
//! Der leere Prefix ist der Default-Namespace; eine leere URI ist explizites
//! Unbinding (`xmlns=""`). Aufgeloest wird gegen den innersten Snapshot —
//! die Default-Bindung gilt dabei fuer Element- und Attributnamen gleich
//! (beobachtetes Verhalten des Serialisierungsmodells, nicht der
//! Attribut-Defaulting-Regel des Namespace-Specs).

use std::rc::Rc;

use crate::qname::QName;
use crate::{Error, FastHashMap, Result};

/// A resolved, serialization-ready name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SerializedName {
    /// Der gewaehlte Prefix; `None` fuer unpraefigierte Namen.
    pub prefix: Option<Rc<str>>,
    pub local: Rc<str>,
}

impl SerializedName {
    /// Render als Tag-Token (`prefix:local` oder `local`).
    pub fn to_token(&self) -> String {
        match &self.prefix {
            Some(pfx) => format!("{}:{}", pfx, self.local),
            None => self.local.to_string(),
        }
    }
}

/// Stack of prefix→URI snapshots, one level per open element, plus the
/// declarations registered for the next element.
pub(crate) struct NamespaceScopes {
    scopes: Vec<FastHashMap<Rc<str>, Rc<str>>>,
    pending: Vec<(Rc<str>, Rc<str>)>,
}

impl NamespaceScopes {
    pub fn new() -> Self {
        Self {
            // Ebene 0: Sicht ausserhalb des Wurzelelements (keine Bindings).
            scopes: vec![FastHashMap::default()],
            pending: Vec::new(),
        }
    }

    /// Registers a binding that takes effect on the next `push`. An empty
    /// URI unbinds the prefix (chiefly useful for the default namespace).
    pub fn declare(&mut self, prefix: &str, uri: &str) {
        self.pending.push((Rc::from(prefix), Rc::from(uri)));
    }

    /// Discards one never-consumed pending declaration, if any.
    ///
    /// Scope-Lebensdauer haengt am Element (`pop`), nicht an diesem Event —
    /// Parser-Eventstroeme melden end-ns nach dem zugehoerigen Element-Ende.
    pub fn undeclare_pending(&mut self) {
        self.pending.pop();
    }

    /// Opens a new scope level: copies the parent snapshot, applies pending
    /// declarations and returns only the bindings that actually changed the
    /// visible view, in declaration order. These become the element's
    /// `xmlns` / `xmlns:prefix` attributes.
    pub fn push(&mut self) -> Vec<(Rc<str>, Rc<str>)> {
        let mut scope = self
            .scopes
            .last()
            .cloned()
            .unwrap_or_default();
        let mut declared = Vec::new();
        for (prefix, uri) in self.pending.drain(..) {
            let visible = scope.get(&prefix).map(|u| &**u).unwrap_or("");
            if visible == &*uri {
                // Identisch zur Elternsicht: nicht re-deklarieren.
                continue;
            }
            scope.insert(prefix.clone(), uri.clone());
            declared.push((prefix, uri));
        }
        self.scopes.push(scope);
        declared
    }

    /// Closes the innermost scope level, restoring the parent view.
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Resolves a qualified name against the innermost scope.
    ///
    /// # Errors
    ///
    /// [`Error::UnboundNamespaceUri`] when the URI is neither the default
    /// namespace nor bound to any prefix — the caller must `declare` first.
    pub fn resolve(&self, qname: &QName) -> Result<SerializedName> {
        if qname.uri.is_empty() {
            return Ok(SerializedName {
                prefix: None,
                local: qname.local_name.clone(),
            });
        }
        let scope = match self.scopes.last() {
            Some(s) => s,
            None => {
                return Err(Error::UnboundNamespaceUri(qname.uri.to_string()));
            }
        };
        if let Some(default_uri) = scope.get("") {
            if **default_uri == *qname.uri {
                return Ok(SerializedName {
                    prefix: None,
                    local: qname.local_name.clone(),
                });
            }
        }
        // Kleinster passender Prefix — deterministisch trotz Hash-Map
        // (dieselbe URI darf an mehrere Prefixe gebunden sein).
        let prefix = scope
            .iter()
            .filter(|(p, u)| !p.is_empty() && ***u == *qname.uri)
            .map(|(p, _)| p)
            .min()
            .cloned();
        match prefix {
            Some(pfx) => Ok(SerializedName {
                prefix: Some(pfx),
                local: qname.local_name.clone(),
            }),
            None => Err(Error::UnboundNamespaceUri(qname.uri.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decls(pairs: Vec<(Rc<str>, Rc<str>)>) -> Vec<(String, String)> {
        pairs
            .into_iter()
            .map(|(p, u)| (p.to_string(), u.to_string()))
            .collect()
    }

    #[test]
    fn declare_takes_effect_on_push() {
        let mut ns = NamespaceScopes::new();
        ns.declare("a", "urn:one");
        assert_eq!(decls(ns.push()), vec![("a".into(), "urn:one".into())]);
        let name = ns.resolve(&QName::new("urn:one", "foo")).unwrap();
        assert_eq!(name.to_token(), "a:foo");
    }

    #[test]
    fn inherited_binding_not_redeclared() {
        let mut ns = NamespaceScopes::new();
        ns.declare("a", "urn:one");
        ns.push();
        ns.declare("a", "urn:one");
        assert!(ns.push().is_empty());
    }

    #[test]
    fn rebinding_is_scoped_to_subtree() {
        let mut ns = NamespaceScopes::new();
        ns.declare("a", "urn:one");
        ns.push();
        ns.declare("a", "urn:two");
        assert_eq!(decls(ns.push()), vec![("a".into(), "urn:two".into())]);
        assert_eq!(
            ns.resolve(&QName::new("urn:two", "x")).unwrap().to_token(),
            "a:x"
        );
        ns.pop();
        // Elternsicht exakt wiederhergestellt.
        assert_eq!(
            ns.resolve(&QName::new("urn:one", "x")).unwrap().to_token(),
            "a:x"
        );
        assert!(ns.resolve(&QName::new("urn:two", "x")).is_err());
    }

    #[test]
    fn default_namespace_and_unbinding() {
        let mut ns = NamespaceScopes::new();
        ns.declare("", "urn:d");
        assert_eq!(decls(ns.push()), vec![("".into(), "urn:d".into())]);
        assert_eq!(
            ns.resolve(&QName::new("urn:d", "foo")).unwrap().to_token(),
            "foo"
        );
        ns.declare("", "");
        assert_eq!(decls(ns.push()), vec![("".into(), "".into())]);
        assert!(ns.resolve(&QName::new("urn:d", "foo")).is_err());
    }

    #[test]
    fn unbound_uri_fails() {
        let ns = NamespaceScopes::new();
        let err = ns.resolve(&QName::new("urn:nope", "x")).unwrap_err();
        assert!(matches!(err, Error::UnboundNamespaceUri(u) if u == "urn:nope"));
    }

    #[test]
    fn end_ns_discards_pending_only() {
        let mut ns = NamespaceScopes::new();
        ns.declare("a", "urn:one");
        ns.undeclare_pending();
        assert!(ns.push().is_empty());
        // Ohne anstehende Deklaration: No-op.
        ns.undeclare_pending();
    }
}
