//! Security groups, their rules and member back-references.

use super::{ensure_empty, int, text};
use crate::document::DocumentQuery;
use crate::error::Result;
use crate::models::{split_cidr, NetworkModel, Rule, SecurityGroup};
use crate::rules::convert_legacy_rule;

/// Read one `rule` element. Absent numeric fields stay `0`.
pub fn read_rule<D: DocumentQuery>(doc: &D, node: D::Node) -> Rule {
    let mut rule = Rule {
        protocol: int(doc, "./protocol", node),
        group_id: text(doc, "./groupId", node),
        group_owner_id: text(doc, "./groupOwnerId", node),
        from_port: int(doc, "./fromPort", node),
        to_port: int(doc, "./toPort", node),
        icmp_type: int(doc, "./icmpType", node),
        icmp_code: int(doc, "./icmpCode", node),
        ..Default::default()
    };
    if let Some(cidr) = doc.last_property("./cidr", node) {
        match split_cidr(&cidr) {
            Some((netaddr, slashnet)) => {
                rule.cidr_netaddr = netaddr;
                rule.cidr_slashnet = slashnet;
            }
            None => log::warn!("cannot split rule cidr '{cidr}'"),
        }
        rule.cidr = cidr;
    }
    rule
}

/// Populate `model.secgroups` from the `securityGroups` section.
///
/// Instances must already be populated: every instance (and, in VPCMIDO
/// mode, every interface) naming a group is linked to it here.
pub fn populate_secgroups<D: DocumentQuery>(
    model: &mut NetworkModel,
    doc: &D,
    section: Option<D::Node>,
) -> Result<()> {
    ensure_empty(model, "security groups", model.secgroups.is_empty())?;
    let Some(section) = section else {
        log::debug!("no securityGroups section in document");
        return Ok(());
    };
    let vpcmido = model.is_vpcmido();

    for node in doc.node_set("./securityGroup", section) {
        let sg_idx = model.secgroups.len();
        let name = doc.name_attr(node).unwrap_or_default();
        let mut sg = SecurityGroup {
            name: name.clone(),
            account_id: text(doc, "./ownerId", node),
            ..Default::default()
        };

        for (idx, instance) in model.instances.iter_mut().enumerate() {
            if instance.has_secgroup(&name) {
                sg.instances.push(idx);
                instance.secgroups.push(sg_idx);
            }
        }
        if vpcmido {
            for (idx, iface) in model.interfaces.iter_mut().enumerate() {
                if iface.has_secgroup(&name) {
                    sg.interfaces.push(idx);
                    iface.secgroups.push(sg_idx);
                }
            }
        }

        sg.group_rules = doc
            .property("./rules/value", node)
            .iter()
            .map(|r| convert_legacy_rule(r).unwrap_or_default())
            .collect();
        sg.ingress_rules = doc
            .node_set("./ingressRules/rule", node)
            .into_iter()
            .map(|r| read_rule(doc, r))
            .collect();
        sg.egress_rules = doc
            .node_set("./egressRules/rule", node)
            .into_iter()
            .map(|r| read_rule(doc, r))
            .collect();

        log::trace!(
            "security group {}: {} instances, {} interfaces, {} ingress, {} egress",
            sg.name,
            sg.instances.len(),
            sg.interfaces.len(),
            sg.ingress_rules.len(),
            sg.egress_rules.len()
        );
        model.secgroups.push(sg);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::instances::populate_instances;
    use crate::document::{ParseContext, XmlDocument};
    use pretty_assertions::assert_eq;

    const DOC: &str = r#"<network-data>
  <instances>
    <instance name="i-1">
      <securityGroups><value>sg-web</value></securityGroups>
      <networkInterfaces>
        <networkInterface name="eni-1">
          <deviceIndex>0</deviceIndex>
          <securityGroups><value>sg-web</value><value>sg-db</value></securityGroups>
        </networkInterface>
      </networkInterfaces>
    </instance>
    <instance name="i-2">
      <securityGroups><value>sg-db</value></securityGroups>
    </instance>
  </instances>
  <securityGroups>
    <securityGroup name="sg-web">
      <ownerId>000111</ownerId>
      <rules>
        <value>-P 6 -p 80-80 -s 0.0.0.0/0</value>
        <value>-P 47</value>
      </rules>
      <ingressRules>
        <rule>
          <protocol>6</protocol>
          <cidr>10.0.0.0/24</cidr>
          <fromPort>22</fromPort>
          <toPort>22</toPort>
        </rule>
        <rule>
          <protocol>1</protocol>
          <groupId>sg-db</groupId>
          <groupOwnerId>000111</groupOwnerId>
          <icmpType>-1</icmpType>
          <icmpCode>-1</icmpCode>
        </rule>
      </ingressRules>
      <egressRules>
        <rule><protocol>-1</protocol><cidr>0.0.0.0/0</cidr></rule>
      </egressRules>
    </securityGroup>
    <securityGroup name="sg-db">
      <ownerId>000111</ownerId>
    </securityGroup>
  </securityGroups>
</network-data>"#;

    fn section<'a>(doc: &XmlDocument<'a>, name: &str) -> Option<roxmltree::NodeId> {
        let root = doc.root().unwrap();
        doc.node_set(&format!("./{name}"), root).first().copied()
    }

    fn build(mode: &str) -> NetworkModel {
        let doc = ParseContext::new().parse(DOC).unwrap();
        let mut model = NetworkModel::new();
        model.mode = mode.to_string();
        populate_instances(&mut model, &doc, section(&doc, "instances")).unwrap();
        populate_secgroups(&mut model, &doc, section(&doc, "securityGroups")).unwrap();
        model
    }

    #[test]
    fn test_rules_read() {
        let model = build("EDGE");
        let web = &model.secgroups[0];
        assert_eq!(web.account_id, "000111");
        assert_eq!(web.group_rules, vec!["-p tcp -m tcp --dport 80".to_string(), String::new()]);
        assert_eq!(web.ingress_rules.len(), 2);

        let ssh = &web.ingress_rules[0];
        assert_eq!(ssh.protocol, 6);
        assert_eq!(ssh.cidr_netaddr, 0x0A000000);
        assert_eq!(ssh.cidr_slashnet, 24);
        assert_eq!((ssh.from_port, ssh.to_port), (22, 22));
        assert_eq!((ssh.icmp_type, ssh.icmp_code), (0, 0));

        let peer = &web.ingress_rules[1];
        assert_eq!(peer.group_id, "sg-db");
        assert_eq!(peer.cidr, "");
        assert_eq!(peer.icmp_type, -1);

        assert_eq!(web.egress_rules[0].protocol, -1);
        assert_eq!(web.egress_rules[0].cidr_slashnet, 0);
    }

    #[test]
    fn test_member_back_references() {
        let model = build("VPCMIDO");
        let web = &model.secgroups[0];
        let db = &model.secgroups[1];
        assert_eq!(web.instances, vec![0]);
        assert_eq!(db.instances, vec![1]);
        assert_eq!(web.interfaces, vec![0]);
        assert_eq!(db.interfaces, vec![0]);
        assert_eq!(model.interfaces[0].secgroups, vec![0, 1]);
    }

    #[test]
    fn test_no_interfaces_outside_vpcmido() {
        let model = build("EDGE");
        assert!(model.secgroups.iter().all(|sg| sg.interfaces.is_empty()));
    }
}
