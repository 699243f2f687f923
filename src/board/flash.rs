//! Halt image persistence in the nRF52840's internal flash.
//!
//! The core works on a RAM [`MemStore`]; after each commit the control
//! loop writes the whole image here as a single `sequential-storage` map
//! item. `sequential-storage` handles wear levelling and GC across the
//! reserved pages.

use defmt::{error, info};
use embedded_storage_async::nor_flash::NorFlash;
use halt_announcer::config::STORE_SIZE;
use halt_announcer::storage::MemStore;
use halt_announcer::Error;

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

/// First flash page of the storage region (see `memory.x`).
pub const STORAGE_FLASH_PAGE_START: u32 = 240;

/// Pages reserved for storage.
pub const STORAGE_FLASH_PAGE_COUNT: u32 = 4;

const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Map key of the halt image.
const KEY_HALT_IMAGE: u8 = 0x01;

/// Scratch buffer for `sequential-storage`: image plus item overhead.
const SCRATCH_SIZE: usize = 512;

/// Load the halt image, or a blank one if none was ever saved.
pub async fn load_image(flash: &mut impl NorFlash) -> MemStore {
    let mut buf = [0u8; SCRATCH_SIZE];

    match sequential_storage::map::fetch_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_HALT_IMAGE,
    )
    .await
    {
        Ok(Some(data)) if data.len() == STORE_SIZE => {
            let mut image = [0u8; STORE_SIZE];
            image.copy_from_slice(data);
            info!("Loaded halt image from flash");
            MemStore::from_image(image)
        }
        Ok(Some(data)) => {
            error!("Stored halt image has {} bytes, ignoring", data.len());
            MemStore::new()
        }
        Ok(None) => {
            info!("No halt image in flash");
            MemStore::new()
        }
        Err(e) => {
            error!("Flash read error: {:?}", defmt::Debug2Format(&e));
            MemStore::new()
        }
    }
}

/// Persist the whole halt image.
pub async fn save_image(flash: &mut impl NorFlash, store: &MemStore) -> Result<(), Error> {
    let mut buf = [0u8; SCRATCH_SIZE];
    let item: &[u8] = store.image();

    sequential_storage::map::store_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut sequential_storage::cache::NoCache::new(),
        &mut buf,
        &KEY_HALT_IMAGE,
        &item,
    )
    .await
    .map_err(|e| {
        error!("Flash write error: {:?}", defmt::Debug2Format(&e));
        Error::Storage
    })?;

    info!("Saved halt image to flash");
    Ok(())
}
