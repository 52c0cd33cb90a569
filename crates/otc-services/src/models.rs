//! Resource types returned by the wrappers and their wire envelopes

use otc_core::ResourceStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Virtual private cloud
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vpc {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub status: String,
}

impl Vpc {
    pub fn status(&self) -> ResourceStatus {
        ResourceStatus::from_remote(&self.status)
    }
}

/// Subnet inside a VPC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subnet {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub vpc_id: String,
    #[serde(default)]
    pub cidr: String,
    #[serde(default)]
    pub gateway_ip: String,
    #[serde(default)]
    pub status: String,
}

impl Subnet {
    pub fn status(&self) -> ResourceStatus {
        ResourceStatus::from_remote(&self.status)
    }
}

/// Inclusive TCP port range; `to == 0` means a single port
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortRange {
    pub from: u16,
    pub to: u16,
}

impl PortRange {
    pub fn single(port: u16) -> Self {
        Self { from: port, to: 0 }
    }

    /// Upper bound with the single-port shorthand resolved
    pub fn upper(&self) -> u16 {
        if self.to == 0 { self.from } else { self.to }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub security_group_rules: Vec<SecurityGroupRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupRule {
    #[serde(default)]
    pub id: String,
    pub security_group_id: String,
    pub direction: String,
    pub ethertype: String,
    pub protocol: Option<String>,
    pub port_range_min: Option<u16>,
    pub port_range_max: Option<u16>,
    pub remote_ip_prefix: Option<String>,
}

/// SSH key pair registered with the compute service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub name: String,
    #[serde(default)]
    pub public_key: String,
    /// Only present when the cloud generated the key
    #[serde(default)]
    pub private_key: Option<String>,
    #[serde(default)]
    pub fingerprint: String,
}

/// Elastic (floating) IP
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingIp {
    pub id: String,
    #[serde(default)]
    pub public_ip_address: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub port_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flavor {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: String,
}

/// Compute server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub status: String,
    /// Addresses keyed by network
    #[serde(default)]
    pub addresses: HashMap<String, Vec<InstanceAddress>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceAddress {
    pub addr: String,
    #[serde(default)]
    pub version: u8,
    #[serde(rename = "OS-EXT-IPS:type", default)]
    pub kind: Option<String>,
}

impl Instance {
    pub fn status(&self) -> ResourceStatus {
        ResourceStatus::from_remote(&self.status)
    }

    /// Whether any interface carries `address`
    pub fn has_address(&self, address: &str) -> bool {
        self.addresses
            .values()
            .flatten()
            .any(|a| a.addr == address)
    }
}

/// Options for creating a server
#[derive(Debug, Clone, Default)]
pub struct CreateInstanceOpts {
    pub name: String,
    pub flavor_name: String,
    pub availability_zone: String,
    /// Security group names
    pub security_groups: Vec<String>,
}

/// Root volume of a new server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskOpts {
    /// Image the volume is created from
    pub source_id: String,
    /// Size in GB
    pub size: u32,
    pub volume_type: String,
}

// ============ Wire types ============

#[derive(Debug, Deserialize)]
pub(crate) struct VpcEnvelope {
    pub vpc: Vpc,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VpcList {
    #[serde(default)]
    pub vpcs: Vec<Vpc>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateVpcRequest<'a> {
    pub vpc: CreateVpc<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateVpc<'a> {
    pub name: &'a str,
    pub cidr: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubnetEnvelope {
    pub subnet: Subnet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubnetList {
    #[serde(default)]
    pub subnets: Vec<Subnet>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSubnetRequest<'a> {
    pub subnet: CreateSubnet<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSubnet<'a> {
    pub name: &'a str,
    pub cidr: &'a str,
    pub gateway_ip: &'a str,
    pub vpc_id: &'a str,
    pub dhcp_enable: bool,
    pub primary_dns: &'a str,
    pub secondary_dns: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecurityGroupEnvelope {
    pub security_group: SecurityGroup,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SecurityGroupList {
    #[serde(default)]
    pub security_groups: Vec<SecurityGroup>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSecurityGroupRequest<'a> {
    pub security_group: CreateSecurityGroup<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateSecurityGroup<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRuleRequest<'a> {
    pub security_group_rule: CreateRule<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateRule<'a> {
    pub security_group_id: &'a str,
    pub direction: &'a str,
    pub ethertype: &'a str,
    pub protocol: &'a str,
    pub port_range_min: u16,
    pub port_range_max: u16,
    pub remote_ip_prefix: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RuleEnvelope {
    pub security_group_rule: SecurityGroupRule,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FloatingIpEnvelope {
    pub publicip: FloatingIp,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FloatingIpList {
    #[serde(default)]
    pub publicips: Vec<FloatingIp>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateFloatingIpRequest<'a> {
    pub publicip: PublicIpSpec<'a>,
    pub bandwidth: BandwidthSpec<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct PublicIpSpec<'a> {
    #[serde(rename = "type")]
    pub ip_type: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct BandwidthSpec<'a> {
    pub name: &'a str,
    pub size: u32,
    pub share_type: &'a str,
    pub charge_mode: &'a str,
}

/// `port_id: null` unbinds the address
#[derive(Debug, Serialize)]
pub(crate) struct UpdateFloatingIpRequest<'a> {
    pub publicip: UpdateFloatingIp<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateFloatingIp<'a> {
    pub port_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct KeyPairEnvelope {
    pub keypair: KeyPair,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateKeyPairRequest<'a> {
    pub keypair: CreateKeyPair<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateKeyPair<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FlavorList {
    #[serde(default)]
    pub flavors: Vec<Flavor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImageList {
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstanceEnvelope {
    pub server: Instance,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InstanceList {
    #[serde(default)]
    pub servers: Vec<Instance>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateInstanceRequest<'a> {
    pub server: CreateInstance<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateInstance<'a> {
    pub name: &'a str,
    #[serde(rename = "flavorRef")]
    pub flavor_ref: &'a str,
    pub availability_zone: &'a str,
    pub key_name: &'a str,
    pub networks: Vec<NetworkRef<'a>>,
    pub security_groups: Vec<NameRef<'a>>,
    pub block_device_mapping_v2: Vec<BlockDevice<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NetworkRef<'a> {
    pub uuid: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct NameRef<'a> {
    pub name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct BlockDevice<'a> {
    pub boot_index: u32,
    pub uuid: &'a str,
    pub source_type: &'a str,
    pub destination_type: &'a str,
    pub volume_size: u32,
    pub volume_type: &'a str,
    pub delete_on_termination: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InterfaceList {
    #[serde(rename = "interfaceAttachments", default)]
    pub interface_attachments: Vec<InterfaceAttachment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InterfaceAttachment {
    pub port_id: String,
}
