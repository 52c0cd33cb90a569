//! VPC, subnet, security group and elastic IP operations

use crate::client::{Client, probe_lookup, probe_status};
use crate::error::{Result, ServiceError};
use crate::models::*;
use crate::names::random_name;
use otc_core::{WaitOutcome, WaitTarget};

pub const DEFAULT_VPC_CIDR: &str = "192.168.0.0/16";
pub const DEFAULT_SUBNET_CIDR: &str = "192.168.0.0/24";
pub const DEFAULT_GATEWAY_IP: &str = "192.168.0.1";
pub const PRIMARY_DNS: &str = "100.125.4.25";
pub const SECONDARY_DNS: &str = "8.8.8.8";

const FLOATING_IP_TYPE: &str = "5_bgp";
const BANDWIDTH_SIZE_MBIT: u32 = 100;

impl Client {
    // ============ VPC ============

    /// Create a VPC with the default CIDR
    pub async fn create_vpc(&self, name: &str) -> Result<Vpc> {
        tracing::info!("Creating VPC: {}", name);
        let request = CreateVpcRequest {
            vpc: CreateVpc {
                name,
                cidr: DEFAULT_VPC_CIDR,
            },
        };
        let created: VpcEnvelope = self.vpc_api()?.post("/vpcs", &request).await?;
        Ok(created.vpc)
    }

    pub async fn get_vpc(&self, vpc_id: &str) -> Result<Vpc> {
        let found: VpcEnvelope = self.vpc_api()?.get(&format!("/vpcs/{}", vpc_id)).await?;
        Ok(found.vpc)
    }

    /// ID of the VPC called `name`
    pub async fn find_vpc(&self, name: &str) -> Result<Option<String>> {
        let list: VpcList = self.vpc_api()?.get("/vpcs").await?;
        Ok(list.vpcs.into_iter().find(|v| v.name == name).map(|v| v.id))
    }

    pub async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        tracing::info!("Deleting VPC: {}", vpc_id);
        self.vpc_api()?.delete(&format!("/vpcs/{}", vpc_id)).await
    }

    pub async fn wait_for_vpc_status(
        &self,
        vpc_id: &str,
        target: impl Into<WaitTarget>,
    ) -> Result<WaitOutcome> {
        let target = target.into();
        self.wait_until(&format!("VPC {} to be {}", vpc_id, target), move || async move {
            probe_lookup(self.get_vpc(vpc_id).await, |vpc| {
                probe_status(vpc_id, vpc.status(), target)
            })
        })
        .await
    }

    // ============ Subnet ============

    /// Create a subnet with the default CIDR, gateway and DNS servers
    pub async fn create_subnet(&self, vpc_id: &str, name: &str) -> Result<Subnet> {
        tracing::info!("Creating subnet {} in VPC {}", name, vpc_id);
        let request = CreateSubnetRequest {
            subnet: CreateSubnet {
                name,
                cidr: DEFAULT_SUBNET_CIDR,
                gateway_ip: DEFAULT_GATEWAY_IP,
                vpc_id,
                dhcp_enable: true,
                primary_dns: PRIMARY_DNS,
                secondary_dns: SECONDARY_DNS,
            },
        };
        let created: SubnetEnvelope = self.vpc_api()?.post("/subnets", &request).await?;
        Ok(created.subnet)
    }

    pub async fn get_subnet(&self, subnet_id: &str) -> Result<Subnet> {
        let found: SubnetEnvelope = self
            .vpc_api()?
            .get(&format!("/subnets/{}", subnet_id))
            .await?;
        Ok(found.subnet)
    }

    /// ID of the subnet called `name` inside `vpc_id`
    pub async fn find_subnet(&self, vpc_id: &str, name: &str) -> Result<Option<String>> {
        let list: SubnetList = self
            .vpc_api()?
            .get_query("/subnets", &[("vpc_id", vpc_id)])
            .await?;
        Ok(list
            .subnets
            .into_iter()
            .find(|s| s.name == name && (s.vpc_id.is_empty() || s.vpc_id == vpc_id))
            .map(|s| s.id))
    }

    pub async fn delete_subnet(&self, vpc_id: &str, subnet_id: &str) -> Result<()> {
        tracing::info!("Deleting subnet {} from VPC {}", subnet_id, vpc_id);
        self.vpc_api()?
            .delete(&format!("/vpcs/{}/subnets/{}", vpc_id, subnet_id))
            .await
    }

    pub async fn wait_for_subnet_status(
        &self,
        subnet_id: &str,
        target: impl Into<WaitTarget>,
    ) -> Result<WaitOutcome> {
        let target = target.into();
        self.wait_until(
            &format!("subnet {} to be {}", subnet_id, target),
            move || async move {
                probe_lookup(self.get_subnet(subnet_id).await, |subnet| {
                    probe_status(subnet_id, subnet.status(), target)
                })
            },
        )
        .await
    }

    // ============ Security groups ============

    /// Create a security group allowing inbound TCP on each range
    pub async fn create_security_group(
        &self,
        name: &str,
        ports: &[PortRange],
    ) -> Result<SecurityGroup> {
        tracing::info!("Creating security group: {}", name);
        let api = self.vpc_api()?;

        let request = CreateSecurityGroupRequest {
            security_group: CreateSecurityGroup { name },
        };
        let created: SecurityGroupEnvelope = api.post("/security-groups", &request).await?;
        let mut group = created.security_group;

        for range in ports {
            let request = CreateRuleRequest {
                security_group_rule: CreateRule {
                    security_group_id: &group.id,
                    direction: "ingress",
                    ethertype: "IPv4",
                    protocol: "tcp",
                    port_range_min: range.from,
                    port_range_max: range.upper(),
                    remote_ip_prefix: "0.0.0.0/0",
                },
            };
            let rule: RuleEnvelope = match api.post("/security-group-rules", &request).await {
                Ok(rule) => rule,
                Err(e) => {
                    // the caller never sees the group id, so remove it here
                    if let Err(cleanup) = self.delete_security_group(&group.id).await {
                        tracing::warn!(
                            "Failed to remove security group {} after rule error: {}",
                            group.id,
                            cleanup
                        );
                    }
                    return Err(e);
                }
            };
            group.security_group_rules.push(rule.security_group_rule);
        }

        Ok(group)
    }

    /// IDs of the security groups with the given names, in name order
    pub async fn find_security_groups(&self, names: &[&str]) -> Result<Vec<String>> {
        let list: SecurityGroupList = self.vpc_api()?.get("/security-groups").await?;
        Ok(names
            .iter()
            .flat_map(|name| {
                list.security_groups
                    .iter()
                    .filter(move |g| g.name == *name)
                    .map(|g| g.id.clone())
            })
            .collect())
    }

    pub async fn delete_security_group(&self, group_id: &str) -> Result<()> {
        tracing::info!("Deleting security group: {}", group_id);
        self.vpc_api()?
            .delete(&format!("/security-groups/{}", group_id))
            .await
    }

    // ============ Elastic IPs ============

    /// Allocate a new elastic IP and return its address
    pub async fn create_floating_ip(&self) -> Result<String> {
        let bandwidth_name = random_name(8, "bw-");
        let request = CreateFloatingIpRequest {
            publicip: PublicIpSpec {
                ip_type: FLOATING_IP_TYPE,
            },
            bandwidth: BandwidthSpec {
                name: &bandwidth_name,
                size: BANDWIDTH_SIZE_MBIT,
                share_type: "PER",
                charge_mode: "traffic",
            },
        };
        let created: FloatingIpEnvelope = self.vpc_api()?.post("/publicips", &request).await?;
        tracing::info!("Allocated floating IP: {}", created.publicip.public_ip_address);
        Ok(created.publicip.public_ip_address)
    }

    async fn lookup_floating_ip(&self, address: &str) -> Result<Option<FloatingIp>> {
        let list: FloatingIpList = self.vpc_api()?.get("/publicips").await?;
        Ok(list
            .publicips
            .into_iter()
            .find(|ip| ip.public_ip_address == address))
    }

    /// Elastic IP ID of `address`
    pub async fn find_floating_ip(&self, address: &str) -> Result<Option<String>> {
        Ok(self.lookup_floating_ip(address).await?.map(|ip| ip.id))
    }

    /// Release `address`; unknown addresses are ignored
    pub async fn delete_floating_ip(&self, address: &str) -> Result<()> {
        match self.find_floating_ip(address).await? {
            Some(id) => {
                tracing::info!("Releasing floating IP: {}", address);
                self.vpc_api()?.delete(&format!("/publicips/{}", id)).await
            }
            None => {
                tracing::debug!("Floating IP not found, nothing to release: {}", address);
                Ok(())
            }
        }
    }

    async fn require_floating_ip(&self, address: &str) -> Result<String> {
        self.find_floating_ip(address)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("floating IP {}", address)))
    }

    /// Attach `address` to the first port of `instance_id`
    pub async fn bind_floating_ip(&self, address: &str, instance_id: &str) -> Result<()> {
        let ip_id = self.require_floating_ip(address).await?;
        let port_id = self.instance_port(instance_id).await?;

        tracing::info!("Binding {} to instance {}", address, instance_id);
        let request = UpdateFloatingIpRequest {
            publicip: UpdateFloatingIp {
                port_id: Some(&port_id),
            },
        };
        let _: FloatingIpEnvelope = self
            .vpc_api()?
            .put(&format!("/publicips/{}", ip_id), &request)
            .await?;
        Ok(())
    }

    pub async fn unbind_floating_ip(&self, address: &str, instance_id: &str) -> Result<()> {
        let ip_id = self.require_floating_ip(address).await?;

        tracing::info!("Unbinding {} from instance {}", address, instance_id);
        let request = UpdateFloatingIpRequest {
            publicip: UpdateFloatingIp { port_id: None },
        };
        let _: FloatingIpEnvelope = self
            .vpc_api()?
            .put(&format!("/publicips/{}", ip_id), &request)
            .await?;
        Ok(())
    }
}
