//! `DescribeLoadBalancerPolicies` response parsing.

use cirrus_domain::{ELB_PREDEFINED_SECURITY_POLICY_NAME_PREFIX, SSL_NEGOTIATION_POLICY_TYPE};
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::ports::ProviderError;

/// API action listing load balancer policies.
pub const DESCRIBE_POLICIES_ACTION: &str = "DescribeLoadBalancerPolicies";

#[derive(Debug, Default)]
struct PolicyEntry {
    name: Option<String>,
    type_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Name,
    TypeName,
}

/// Extracts predefined TLS negotiation policy names from a response body.
///
/// Only entries of the SSL negotiation type whose name carries the predefined
/// prefix are returned, in document order.
///
/// # Errors
///
/// Returns a malformed-response [`ProviderError`] when the body is not XML.
pub fn parse_predefined_policies(xml: &str) -> Result<Vec<String>, ProviderError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut names = Vec::new();
    let mut depth = 0usize;
    let mut descriptions_depth: Option<usize> = None;
    let mut current: Option<PolicyEntry> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let local = e.local_name();
                match (local.as_ref(), descriptions_depth) {
                    (b"PolicyDescriptions", None) => descriptions_depth = Some(depth),
                    (_, Some(d)) if depth == d + 1 => current = Some(PolicyEntry::default()),
                    (b"PolicyName", Some(_)) => field = Some(Field::Name),
                    (b"PolicyTypeName", Some(_)) => field = Some(Field::TypeName),
                    _ => {}
                }
            }
            Ok(Event::Text(e)) => {
                if let (Some(entry), Some(kind)) = (current.as_mut(), field) {
                    let text = e
                        .unescape()
                        .map_err(|err| ProviderError::malformed_response(err.to_string()))?
                        .into_owned();
                    // First occurrence wins, like a descendant search.
                    let slot = match kind {
                        Field::Name => &mut entry.name,
                        Field::TypeName => &mut entry.type_name,
                    };
                    slot.get_or_insert(text);
                }
            }
            Ok(Event::End(_)) => {
                field = None;
                match descriptions_depth {
                    Some(d) if depth == d + 1 => {
                        if let Some(name) = current.take().and_then(predefined_name) {
                            names.push(name);
                        }
                    }
                    Some(d) if depth == d => descriptions_depth = None,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(err) => return Err(ProviderError::malformed_response(err.to_string())),
            _ => {}
        }
    }

    Ok(names)
}

fn predefined_name(entry: PolicyEntry) -> Option<String> {
    let is_negotiation = entry.type_name.as_deref() == Some(SSL_NEGOTIATION_POLICY_TYPE);
    entry.name.filter(|name| {
        is_negotiation && name.starts_with(ELB_PREDEFINED_SECURITY_POLICY_NAME_PREFIX)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<DescribeLoadBalancerPoliciesResponse xmlns="http://elasticloadbalancing.amazonaws.com/doc/2012-12-01/">
  <DescribeLoadBalancerPoliciesResult>
    <PolicyDescriptions>
      <member>
        <PolicyAttributeDescriptions>
          <member><AttributeName>Protocol-TLSv1</AttributeName><AttributeValue>true</AttributeValue></member>
        </PolicyAttributeDescriptions>
        <PolicyName>ELBSecurityPolicy-2015-02</PolicyName>
        <PolicyTypeName>SSLNegotiationPolicyType</PolicyTypeName>
      </member>
      <member>
        <PolicyName>ELBSecurityPolicy-2016-08</PolicyName>
        <PolicyTypeName>SSLNegotiationPolicyType</PolicyTypeName>
      </member>
      <member>
        <PolicyName>ELBSample-OpenSSLDefaultCipherPolicy</PolicyName>
        <PolicyTypeName>SSLNegotiationPolicyType</PolicyTypeName>
      </member>
      <member>
        <PolicyName>ELBSecurityPolicy-Stickiness</PolicyName>
        <PolicyTypeName>LBCookieStickinessPolicyType</PolicyTypeName>
      </member>
    </PolicyDescriptions>
  </DescribeLoadBalancerPoliciesResult>
</DescribeLoadBalancerPoliciesResponse>"#;

    #[test]
    fn test_parse_predefined_policies() {
        let names = parse_predefined_policies(BODY).unwrap();
        assert_eq!(
            names,
            vec!["ELBSecurityPolicy-2015-02", "ELBSecurityPolicy-2016-08"]
        );
    }

    #[test]
    fn test_missing_descriptions_yields_nothing() {
        let names = parse_predefined_policies("<Response><Other/></Response>").unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn test_malformed_body() {
        assert!(parse_predefined_policies("<Response><PolicyDescriptions></Response>").is_err());
    }
}
