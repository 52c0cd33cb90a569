//! Key pair, flavor, image and server operations

use crate::client::{Client, probe_lookup, probe_status};
use crate::error::{Result, ServiceError};
use crate::models::*;
use otc_core::{CloudError, Probe, WaitOutcome, WaitTarget};
use serde_json::json;

pub const DEFAULT_AVAILABILITY_ZONE: &str = "eu-de-03";
pub const DEFAULT_FLAVOR: &str = "s2.large.2";
pub const DEFAULT_IMAGE: &str = "Standard_Debian_10_latest";

/// Root volume size in GB
pub const DEFAULT_DISK_SIZE: u32 = 10;
pub const DEFAULT_VOLUME_TYPE: &str = "SATA";

impl Client {
    // ============ Key pairs ============

    /// Register a key pair
    ///
    /// With an empty `public_key` the cloud generates the pair and returns the
    /// private key once. With a supplied key no private key comes back.
    pub async fn create_key_pair(&self, name: &str, public_key: &str) -> Result<KeyPair> {
        tracing::info!("Creating key pair: {}", name);
        let request = CreateKeyPairRequest {
            keypair: CreateKeyPair {
                name,
                public_key: Some(public_key).filter(|k| !k.trim().is_empty()),
            },
        };
        let created: KeyPairEnvelope = self.compute_api()?.post("/os-keypairs", &request).await?;
        Ok(created.keypair)
    }

    /// Name of the key pair, if registered
    pub async fn find_key_pair(&self, name: &str) -> Result<Option<String>> {
        let result: Result<KeyPairEnvelope> = self
            .compute_api()?
            .get(&format!("/os-keypairs/{}", name))
            .await;
        match result {
            Ok(found) => Ok(Some(found.keypair.name)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn delete_key_pair(&self, name: &str) -> Result<()> {
        tracing::info!("Deleting key pair: {}", name);
        self.compute_api()?
            .delete(&format!("/os-keypairs/{}", name))
            .await
    }

    // ============ Flavors & images ============

    pub async fn find_flavor(&self, name: &str) -> Result<Option<String>> {
        let list: FlavorList = self.compute_api()?.get("/flavors/detail").await?;
        Ok(list.flavors.into_iter().find(|f| f.name == name).map(|f| f.id))
    }

    /// ID of the active image called `name`
    pub async fn find_image(&self, name: &str) -> Result<Option<String>> {
        let list: ImageList = self
            .image_api()?
            .get_query("/images", &[("name", name), ("status", "active")])
            .await?;
        Ok(list
            .images
            .into_iter()
            .find(|i| i.name == name)
            .map(|i| i.id))
    }

    // ============ Instances ============

    /// Boot a server from a new volume on `subnet_id`
    pub async fn create_instance(
        &self,
        opts: &CreateInstanceOpts,
        subnet_id: &str,
        key_pair_name: &str,
        disk: &DiskOpts,
    ) -> Result<Instance> {
        let flavor_id = self
            .find_flavor(&opts.flavor_name)
            .await?
            .ok_or_else(|| CloudError::ResourceNotFound(format!("flavor {}", opts.flavor_name)))?;

        tracing::info!(
            "Creating instance {} ({}) in {}",
            opts.name,
            opts.flavor_name,
            opts.availability_zone
        );

        let request = CreateInstanceRequest {
            server: CreateInstance {
                name: &opts.name,
                flavor_ref: &flavor_id,
                availability_zone: &opts.availability_zone,
                key_name: key_pair_name,
                networks: vec![NetworkRef { uuid: subnet_id }],
                security_groups: opts
                    .security_groups
                    .iter()
                    .map(|name| NameRef { name })
                    .collect(),
                block_device_mapping_v2: vec![BlockDevice {
                    boot_index: 0,
                    uuid: &disk.source_id,
                    source_type: "image",
                    destination_type: "volume",
                    volume_size: disk.size,
                    volume_type: &disk.volume_type,
                    delete_on_termination: true,
                }],
            },
        };

        let created: InstanceEnvelope = self.compute_api()?.post("/servers", &request).await?;
        let mut instance = created.server;
        if instance.name.is_empty() {
            instance.name = opts.name.clone();
        }
        Ok(instance)
    }

    /// ID of the server called `name`
    pub async fn find_instance(&self, name: &str) -> Result<Option<String>> {
        let list: InstanceList = self
            .compute_api()?
            .get_query("/servers", &[("name", name)])
            .await?;
        // the name filter is a regex on the service side
        Ok(list
            .servers
            .into_iter()
            .find(|s| s.name == name)
            .map(|s| s.id))
    }

    /// Current details of a server
    pub async fn get_instance_status(&self, instance_id: &str) -> Result<Instance> {
        let found: InstanceEnvelope = self
            .compute_api()?
            .get(&format!("/servers/{}", instance_id))
            .await?;
        Ok(found.server)
    }

    pub async fn delete_instance(&self, instance_id: &str) -> Result<()> {
        tracing::info!("Deleting instance: {}", instance_id);
        self.compute_api()?
            .delete(&format!("/servers/{}", instance_id))
            .await
    }

    async fn instance_action(&self, instance_id: &str, action: serde_json::Value) -> Result<()> {
        self.compute_api()?
            .post_empty(&format!("/servers/{}/action", instance_id), &action)
            .await
    }

    pub async fn start_instance(&self, instance_id: &str) -> Result<()> {
        tracing::info!("Starting instance: {}", instance_id);
        self.instance_action(instance_id, json!({ "os-start": null }))
            .await
    }

    pub async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        tracing::info!("Stopping instance: {}", instance_id);
        self.instance_action(instance_id, json!({ "os-stop": null }))
            .await
    }

    /// Soft reboot
    pub async fn restart_instance(&self, instance_id: &str) -> Result<()> {
        tracing::info!("Restarting instance: {}", instance_id);
        self.instance_action(instance_id, json!({ "reboot": { "type": "SOFT" } }))
            .await
    }

    /// Port of the first interface attached to the server
    pub(crate) async fn instance_port(&self, instance_id: &str) -> Result<String> {
        let list: InterfaceList = self
            .compute_api()?
            .get(&format!("/servers/{}/os-interface", instance_id))
            .await?;
        list.interface_attachments
            .into_iter()
            .next()
            .map(|a| a.port_id)
            .ok_or_else(|| ServiceError::NotFound(format!("port of instance {}", instance_id)))
    }

    /// Whether `address` is currently assigned to the server
    pub async fn instance_bound_to_ip(&self, instance_id: &str, address: &str) -> Result<bool> {
        Ok(self.get_instance_status(instance_id).await?.has_address(address))
    }

    pub async fn wait_for_instance_status(
        &self,
        instance_id: &str,
        target: impl Into<WaitTarget>,
    ) -> Result<WaitOutcome> {
        let target = target.into();
        self.wait_until(
            &format!("instance {} to be {}", instance_id, target),
            move || async move {
                probe_lookup(self.get_instance_status(instance_id).await, |instance| {
                    probe_status(instance_id, instance.status(), target)
                })
            },
        )
        .await
    }

    /// Wait until `address` is (or is no longer) assigned to the server
    pub async fn wait_for_instance_ip_bind(
        &self,
        instance_id: &str,
        address: &str,
        bound: bool,
    ) -> Result<WaitOutcome> {
        self.wait_until(
            &format!("{} bound={} on instance {}", address, bound, instance_id),
            move || async move {
                self.instance_bound_to_ip(instance_id, address)
                    .await
                    .map(|assigned| {
                        if assigned == bound {
                            Probe::Reached
                        } else {
                            Probe::Pending
                        }
                    })
            },
        )
        .await
    }
}
