//! Instances and, in VPCMIDO mode, their network interfaces.

use super::{addr, ensure_empty, int, text};
use crate::document::DocumentQuery;
use crate::error::Result;
use crate::models::{is_interface_name, Instance, MacAddr, NetworkModel};

/// Read the fields shared by instances and interfaces from `node`.
///
/// # Arguments
/// * `doc` - The document
/// * `node` - An `instance` or `networkInterface` element
/// * `owner` - Owning instance name for interfaces, empty for instances
pub fn read_instance_or_interface<D: DocumentQuery>(doc: &D, node: D::Node, owner: &str) -> Instance {
    let name = doc.name_attr(node).unwrap_or_else(|| {
        log::error!("instance element without a name");
        String::new()
    });
    log::trace!("going to populate: {name}");

    let mut instance = Instance {
        instance_name: owner.to_string(),
        account_id: text(doc, "./ownerId", node),
        public_ip: addr(doc, "./publicIp", node),
        private_ip: addr(doc, "./privateIp", node),
        vpc: text(doc, "./vpc", node),
        subnet: text(doc, "./subnet", node),
        secgroup_names: doc.property("./securityGroups/value", node),
        attachment_id: text(doc, "./attachmentId", node),
        ..Default::default()
    };
    if let Some(mac) = doc.last_property("./macAddress", node) {
        instance.mac_address = MacAddr::parse(&mac).unwrap_or_else(|| {
            log::warn!("{name}: cannot parse mac address '{mac}'");
            MacAddr::default()
        });
    }

    if is_interface_name(&name) {
        instance.src_dst_check = doc
            .last_property("./sourceDestCheck", node)
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);
        instance.device_index = int(doc, "./deviceIndex", node);
        instance.ifname = name.clone();
        // The primary interface is known by its instance's name.
        instance.name = if instance.device_index == 0 {
            owner.to_string()
        } else {
            name
        };
    } else {
        instance.name = name;
    }
    instance
}

/// Populate `model.instances` (and `model.interfaces` in VPCMIDO mode) from
/// the `instances` section, then sort the instances by name.
///
/// # Returns
/// * `Err(GniError::ContractViolation)` - If instances were already populated
pub fn populate_instances<D: DocumentQuery>(
    model: &mut NetworkModel,
    doc: &D,
    section: Option<D::Node>,
) -> Result<()> {
    ensure_empty(model, "instances", model.instances.is_empty())?;
    let Some(section) = section else {
        log::debug!("no instances section in document");
        model.sorted_instances = true;
        return Ok(());
    };

    let nodes = doc.node_set("./instance", section);
    log::trace!("Found {} instances", nodes.len());
    let vpcmido = model.is_vpcmido();

    for node in nodes {
        let mut instance = read_instance_or_interface(doc, node, "");
        if vpcmido {
            let iface_nodes = doc.node_set("./networkInterfaces/networkInterface", node);
            log::trace!("Found {} interfaces for {}", iface_nodes.len(), instance.name);
            for iface_node in iface_nodes {
                let iface = read_instance_or_interface(doc, iface_node, &instance.name);
                instance.interfaces.push(model.interfaces.len());
                model.interfaces.push(iface);
            }
        }
        model.instances.push(instance);
    }

    model.sort_instances();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ParseContext;
    use crate::error::GniError;

    const DOC: &str = r#"<network-data>
  <instances>
    <instance name="i-b">
      <ownerId>000111</ownerId>
      <macAddress>d0:0d:4a:1d:08:18</macAddress>
      <publicIp>1.2.3.4</publicIp>
      <privateIp>10.0.0.5</privateIp>
      <vpc>vpc-1</vpc>
      <subnet>subnet-1</subnet>
      <securityGroups><value>sg-1</value><value>sg-2</value></securityGroups>
      <networkInterfaces>
        <networkInterface name="eni-1">
          <ownerId>000111</ownerId>
          <privateIp>10.0.0.5</privateIp>
          <sourceDestCheck>True</sourceDestCheck>
          <deviceIndex>0</deviceIndex>
          <attachmentId>eni-attach-1</attachmentId>
          <securityGroups><value>sg-1</value></securityGroups>
        </networkInterface>
        <networkInterface name="eni-2">
          <ownerId>000111</ownerId>
          <privateIp>10.0.0.6</privateIp>
          <sourceDestCheck>false</sourceDestCheck>
          <deviceIndex>1</deviceIndex>
        </networkInterface>
      </networkInterfaces>
    </instance>
    <instance name="i-a">
      <ownerId>000222</ownerId>
      <privateIp>10.0.0.7</privateIp>
    </instance>
  </instances>
</network-data>"#;

    fn build(mode: &str) -> NetworkModel {
        let doc = ParseContext::new().parse(DOC).unwrap();
        let root = doc.root().unwrap();
        let section = doc.node_set("./instances", root).first().copied();
        let mut model = NetworkModel::new();
        model.mode = mode.to_string();
        populate_instances(&mut model, &doc, section).unwrap();
        model
    }

    #[test]
    fn test_instances_sorted_with_fields() {
        let model = build("EDGE");
        let names: Vec<&str> = model.instances.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["i-a", "i-b"]);
        assert!(model.sorted_instances);

        let vm = &model.instances[1];
        assert_eq!(vm.account_id, "000111");
        assert_eq!(vm.public_ip, 0x01020304);
        assert_eq!(vm.private_ip, 0x0A000005);
        assert_eq!(vm.mac_address.to_string(), "d0:0d:4a:1d:08:18");
        assert_eq!(vm.secgroup_names, vec!["sg-1", "sg-2"]);
        assert!(!vm.is_interface());
    }

    #[test]
    fn test_interfaces_only_in_vpcmido() {
        assert!(build("EDGE").interfaces.is_empty());

        let model = build("VPCMIDO");
        assert_eq!(model.interfaces.len(), 2);
        let vm = &model.instances[1];
        assert_eq!(vm.interfaces, vec![0, 1]);

        let primary = &model.interfaces[0];
        assert_eq!(primary.name, "i-b");
        assert_eq!(primary.ifname, "eni-1");
        assert_eq!(primary.instance_name, "i-b");
        assert!(primary.src_dst_check);
        assert_eq!(primary.attachment_id, "eni-attach-1");

        let secondary = &model.interfaces[1];
        assert_eq!(secondary.name, "eni-2");
        assert_eq!(secondary.device_index, 1);
        assert!(!secondary.src_dst_check);
        assert!(secondary.is_secondary());
    }

    #[test]
    fn test_refuses_populated_target() {
        let doc = ParseContext::new().parse(DOC).unwrap();
        let mut model = build("EDGE");
        let err = populate_instances(&mut model, &doc, None).unwrap_err();
        assert!(matches!(err, GniError::ContractViolation(_)));
    }
}
