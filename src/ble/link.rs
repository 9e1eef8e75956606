//! BLE central link for the active wireless profile.
//!
//! The dongle holds at most one link at a time: the peripheral bonded to
//! the active profile. An open profile runs a pairing scan and bonds the
//! first HID peripheral that answers. Switching profiles drops the
//! current link and starts over with the new slot.

use core::cell::{Cell, RefCell};

use defmt::{info, warn};
use embassy_futures::select::{select, Either};
use embassy_time::{with_timeout, Duration, Timer};
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{
    central, Address, AddressType, Connection, EncryptError, EncryptionInfo, IdentityKey,
    MasterId, SecurityMode,
};
use nrf_softdevice::raw;
use nrf_softdevice::Softdevice;
use output_status::ble::adv::{advertises_hid, local_name};
use output_status::ble::bonds::BondTable;
use output_status::config::{
    BLE_CONN_INTERVAL_MAX, BLE_CONN_INTERVAL_MIN, BLE_LINK_POLL_MS, BLE_PAIRING_SCAN_SECS,
    BLE_RECONNECT_BACKOFF_MS, BLE_SLAVE_LATENCY, BLE_SUP_TIMEOUT, WIRELESS_PROFILE_COUNT,
};
use output_status::endpoint::{AddressKind, BondAddress};
use output_status::error::BleError;

use crate::{read_endpoints, update_endpoints};

/// Keys exchanged with one bonded peripheral.
struct ProfileKeys {
    master_id: MasterId,
    key: EncryptionInfo,
    peer_id: IdentityKey,
}

/// Security handler that files LTKs by wireless profile.
///
/// The link task points [`Bonder::pair_into`] at the active profile
/// before connecting, so a bond completed on that link lands in the
/// active profile's slot and nowhere else.
pub struct Bonder {
    target: Cell<usize>,
    keys: RefCell<BondTable<ProfileKeys, WIRELESS_PROFILE_COUNT>>,
}

impl Bonder {
    pub fn new() -> Self {
        Self {
            target: Cell::new(0),
            keys: RefCell::new(BondTable::new()),
        }
    }

    /// Profile slot the next completed bond is stored under.
    pub fn pair_into(&self, index: usize) {
        self.target.set(index);
    }

    /// Drop the keys of a cleared profile.
    pub fn forget(&self, index: usize) {
        if self.keys.borrow_mut().forget(index).is_some() {
            info!("Profile {} keys forgotten", index);
        }
    }
}

impl SecurityHandler for Bonder {
    fn io_capabilities(&self) -> IoCapabilities {
        IoCapabilities::None
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        true
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        peer_id: IdentityKey,
    ) {
        let index = self.target.get();
        let keys = ProfileKeys {
            master_id,
            key,
            peer_id,
        };
        if !self.keys.borrow_mut().store(index, keys) {
            warn!("Bond for unknown profile {} discarded", index);
        }
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        self.keys
            .borrow()
            .find_map(|k| (k.master_id == master_id).then_some(k.key))
    }

    fn get_peripheral_key(&self, conn: &Connection) -> Option<(MasterId, EncryptionInfo)> {
        let peer = conn.peer_address();
        self.keys
            .borrow()
            .find_map(|k| k.peer_id.is_match(peer).then_some((k.master_id, k.key)))
    }

    fn on_security_update(&self, _conn: &Connection, mode: SecurityMode) {
        info!("BLE security mode updated: {}", mode);
    }
}

/// Keep the active profile's link up for as long as the firmware runs.
pub async fn link_task(sd: &'static Softdevice, bonder: &'static Bonder) -> ! {
    loop {
        let (index, slot) = read_endpoints(|t| (t.active_profile_index(), *t.active_profile()));
        if slot.address.is_none() {
            bonder.forget(index);
        }
        bonder.pair_into(index);

        let conn = match select(establish(sd, bonder, slot.address), profile_switched(index)).await {
            Either::First(Ok(conn)) => conn,
            Either::First(Err(e)) => {
                warn!("Profile {} link failed: {}", index, e);
                Timer::after(Duration::from_millis(BLE_RECONNECT_BACKOFF_MS)).await;
                continue;
            }
            Either::Second(()) => continue,
        };

        if slot.address.is_none() {
            let address = bond_address(conn.peer_address());
            info!("Profile {} bonded to {}", index, address);
            update_endpoints(|t| t.bond_profile(index, address));
        }
        update_endpoints(|t| t.set_profile_connected(index, true));

        hold_link(&conn, index).await;

        update_endpoints(|t| t.set_profile_connected(index, false));
        info!("Profile {} link closed", index);
    }
}

async fn establish(
    sd: &'static Softdevice,
    bonder: &'static Bonder,
    bonded: Option<BondAddress>,
) -> Result<Connection, BleError> {
    let peer = match bonded {
        Some(address) => bonded_peer(address),
        None => discover_hid_peer(sd).await?,
    };
    connect(sd, bonder, peer).await
}

fn bond_address(address: Address) -> BondAddress {
    let kind = match address.address_type() {
        AddressType::Public => AddressKind::Public,
        AddressType::RandomStatic => AddressKind::RandomStatic,
        AddressType::RandomPrivateResolvable => AddressKind::RandomPrivateResolvable,
        AddressType::RandomPrivateNonResolvable => AddressKind::RandomPrivateNonResolvable,
        AddressType::Anonymous => AddressKind::Anonymous,
    };
    BondAddress::new(kind, address.bytes())
}

fn bonded_peer(address: BondAddress) -> Address {
    let kind = match address.kind {
        AddressKind::Public => AddressType::Public,
        AddressKind::RandomStatic => AddressType::RandomStatic,
        AddressKind::RandomPrivateResolvable => AddressType::RandomPrivateResolvable,
        AddressKind::RandomPrivateNonResolvable => AddressType::RandomPrivateNonResolvable,
        AddressKind::Anonymous => AddressType::Anonymous,
    };
    Address::new(kind, address.bytes)
}

/// Resolves once `index` is no longer the active profile.
async fn profile_switched(index: usize) {
    loop {
        Timer::after(Duration::from_millis(BLE_LINK_POLL_MS)).await;
        if read_endpoints(|t| t.active_profile_index()) != index {
            return;
        }
    }
}

/// Wait until the link drops, the user moves to another profile, or the
/// profile is cleared.
async fn hold_link(conn: &Connection, index: usize) {
    loop {
        Timer::after(Duration::from_millis(BLE_LINK_POLL_MS)).await;
        if !conn.is_connected() {
            return;
        }
        let still_held =
            read_endpoints(|t| t.active_profile_index() == index && t.active_profile().is_bonded());
        if !still_held {
            let _ = conn.disconnect();
            return;
        }
    }
}

/// First peripheral advertising the HID service within the pairing window.
async fn discover_hid_peer(sd: &Softdevice) -> Result<Address, BleError> {
    info!("Pairing scan ({} s window)", BLE_PAIRING_SCAN_SECS);

    let config = central::ScanConfig {
        // Active scan to retrieve scan-response data (device names).
        active: true,
        ..Default::default()
    };

    let scan = central::scan(sd, &config, |params| {
        let data =
            unsafe { core::slice::from_raw_parts(params.data.p_data, params.data.len as usize) };
        if !advertises_hid(data) {
            return None;
        }
        info!("Pairing with {}", local_name(data).unwrap_or("unnamed peripheral"));
        Some(Address::from_raw(params.peer_addr))
    });

    match with_timeout(Duration::from_secs(BLE_PAIRING_SCAN_SECS), scan).await {
        Ok(Ok(address)) => Ok(address),
        Ok(Err(_)) | Err(_) => Err(BleError::ScanFailed),
    }
}

async fn connect(
    sd: &'static Softdevice,
    bonder: &'static Bonder,
    address: Address,
) -> Result<Connection, BleError> {
    let whitelist = [&address];
    let conn_cfg = central::ConnectConfig {
        scan_config: central::ScanConfig {
            whitelist: Some(&whitelist),
            ..Default::default()
        },
        conn_params: raw::ble_gap_conn_params_t {
            min_conn_interval: BLE_CONN_INTERVAL_MIN,
            max_conn_interval: BLE_CONN_INTERVAL_MAX,
            slave_latency: BLE_SLAVE_LATENCY,
            conn_sup_timeout: BLE_SUP_TIMEOUT,
        },
        ..Default::default()
    };

    let conn = central::connect_with_security(sd, &conn_cfg, bonder)
        .await
        .map_err(|_| BleError::ConnectFailed)?;

    let secure = match conn.encrypt() {
        Ok(()) => wait_for_secure_link(&conn).await,
        Err(EncryptError::PeerKeysNotFound) => {
            conn.request_pairing().is_ok() && wait_for_secure_link(&conn).await
        }
        Err(_) => false,
    };

    if !secure {
        let _ = conn.disconnect();
        return Err(BleError::SecurityFailed);
    }
    Ok(conn)
}

async fn wait_for_secure_link(conn: &Connection) -> bool {
    for _ in 0..25 {
        match conn.security_mode() {
            SecurityMode::NoAccess | SecurityMode::Open => {
                Timer::after(Duration::from_millis(200)).await
            }
            _ => return true,
        }
    }
    false
}
