//! Vocabulary IRIs used by the access-control layer.

/// RDF core vocabulary.
pub mod rdf {
    /// `rdf:type`
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// FOAF vocabulary.
pub mod foaf {
    /// `foaf:Agent`, the WAC agent class meaning "everyone".
    pub const AGENT: &str = "http://xmlns.com/foaf/0.1/Agent";
}

/// PIM space vocabulary.
pub mod pim {
    /// `pim:Storage`, declared on the storage root via `Link rel="type"`.
    pub const STORAGE: &str = "http://www.w3.org/ns/pim/space#Storage";
}

/// Linked Data Platform vocabulary.
pub mod ldp {
    /// `ldp:BasicContainer`
    pub const BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
    /// `ldp:Container`
    pub const CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
}

/// Web Access Control vocabulary.
pub mod acl {
    /// `acl:Authorization`
    pub const AUTHORIZATION: &str = "http://www.w3.org/ns/auth/acl#Authorization";
    /// `acl:accessTo`
    pub const ACCESS_TO: &str = "http://www.w3.org/ns/auth/acl#accessTo";
    /// `acl:default`
    pub const DEFAULT: &str = "http://www.w3.org/ns/auth/acl#default";
    /// `acl:defaultForNew`, the legacy spelling of `acl:default`.
    pub const DEFAULT_FOR_NEW: &str = "http://www.w3.org/ns/auth/acl#defaultForNew";
    /// `acl:agent`
    pub const AGENT: &str = "http://www.w3.org/ns/auth/acl#agent";
    /// `acl:agentClass`
    pub const AGENT_CLASS: &str = "http://www.w3.org/ns/auth/acl#agentClass";
    /// `acl:agentGroup`
    pub const AGENT_GROUP: &str = "http://www.w3.org/ns/auth/acl#agentGroup";
    /// `acl:origin`
    pub const ORIGIN: &str = "http://www.w3.org/ns/auth/acl#origin";
    /// `acl:mode`
    pub const MODE: &str = "http://www.w3.org/ns/auth/acl#mode";
    /// `acl:AuthenticatedAgent`
    pub const AUTHENTICATED_AGENT: &str = "http://www.w3.org/ns/auth/acl#AuthenticatedAgent";
    /// `acl:Read`
    pub const READ: &str = "http://www.w3.org/ns/auth/acl#Read";
    /// `acl:Append`
    pub const APPEND: &str = "http://www.w3.org/ns/auth/acl#Append";
    /// `acl:Write`
    pub const WRITE: &str = "http://www.w3.org/ns/auth/acl#Write";
    /// `acl:Control`
    pub const CONTROL: &str = "http://www.w3.org/ns/auth/acl#Control";
}

/// Access Control Policy vocabulary.
pub mod acp {
    /// `acp:AccessControlResource`
    pub const ACCESS_CONTROL_RESOURCE: &str = "http://www.w3.org/ns/solid/acp#AccessControlResource";
    /// `acp:AccessControl`
    pub const ACCESS_CONTROL_TYPE: &str = "http://www.w3.org/ns/solid/acp#AccessControl";
    /// `acp:resource`
    pub const RESOURCE: &str = "http://www.w3.org/ns/solid/acp#resource";
    /// `acp:accessControl`
    pub const ACCESS_CONTROL: &str = "http://www.w3.org/ns/solid/acp#accessControl";
    /// `acp:memberAccessControl`
    pub const MEMBER_ACCESS_CONTROL: &str = "http://www.w3.org/ns/solid/acp#memberAccessControl";
    /// `acp:access`, policies governing the ACR itself.
    pub const ACCESS: &str = "http://www.w3.org/ns/solid/acp#access";
    /// `acp:accessMembers`, policies governing the ACRs of children.
    pub const ACCESS_MEMBERS: &str = "http://www.w3.org/ns/solid/acp#accessMembers";
    /// `acp:apply`
    pub const APPLY: &str = "http://www.w3.org/ns/solid/acp#apply";
    /// `acp:Policy`
    pub const POLICY: &str = "http://www.w3.org/ns/solid/acp#Policy";
    /// `acp:Matcher`
    pub const MATCHER: &str = "http://www.w3.org/ns/solid/acp#Matcher";
    /// `acp:allOf`
    pub const ALL_OF: &str = "http://www.w3.org/ns/solid/acp#allOf";
    /// `acp:anyOf`
    pub const ANY_OF: &str = "http://www.w3.org/ns/solid/acp#anyOf";
    /// `acp:noneOf`
    pub const NONE_OF: &str = "http://www.w3.org/ns/solid/acp#noneOf";
    /// `acp:allow`
    pub const ALLOW: &str = "http://www.w3.org/ns/solid/acp#allow";
    /// `acp:deny`
    pub const DENY: &str = "http://www.w3.org/ns/solid/acp#deny";
    /// `acp:agent`
    pub const AGENT: &str = "http://www.w3.org/ns/solid/acp#agent";
    /// `acp:client`
    pub const CLIENT: &str = "http://www.w3.org/ns/solid/acp#client";
    /// `acp:PublicAgent`
    pub const PUBLIC_AGENT: &str = "http://www.w3.org/ns/solid/acp#PublicAgent";
    /// `acp:AuthenticatedAgent`
    pub const AUTHENTICATED_AGENT: &str = "http://www.w3.org/ns/solid/acp#AuthenticatedAgent";
    /// `acp:CreatorAgent`
    pub const CREATOR_AGENT: &str = "http://www.w3.org/ns/solid/acp#CreatorAgent";
    /// `acp:PublicClient`
    pub const PUBLIC_CLIENT: &str = "http://www.w3.org/ns/solid/acp#PublicClient";
}
