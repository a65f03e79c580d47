use devicelink::db::{create_memory_pool, seed};
use devicelink::models::{Platform, UpsertDevice};

use crate::common::*;

fn seeded_pool() -> devicelink::db::DbPool {
    let pool = create_memory_pool().unwrap();
    {
        let mut conn = pool.get().unwrap();
        seed::reset_and_seed_data(&mut conn).unwrap();
    }
    pool
}

#[test]
fn test_upsert_keeps_stored_fields_when_not_provided() {
    let pool = seeded_pool();
    let conn = pool.get().unwrap();

    queries::upsert_device(
        &conn,
        DEMO_APP_ID,
        SEEDED_DEVICE_ID,
        &UpsertDevice {
            custom_id: Some("customer-42".into()),
            ..Default::default()
        },
    )
    .unwrap();

    let device = queries::get_device(&conn, DEMO_APP_ID, SEEDED_DEVICE_ID)
        .unwrap()
        .unwrap()
        .device;
    assert_eq!(device.custom_id.as_deref(), Some("customer-42"));
    assert_eq!(device.version_name.as_deref(), Some(SEEDED_DEVICE_VERSION));
    assert_eq!(device.platform, Some(Platform::Android));
    assert!(device.is_prod);
}

#[test]
fn test_link_device_writes_device_and_override() {
    let pool = seeded_pool();
    let mut conn = pool.get().unwrap();
    let channel = queries::get_channel_by_name(&conn, DEMO_APP_ID, NO_ACCESS_CHANNEL)
        .unwrap()
        .unwrap();

    let linked = queries::link_device(
        &mut conn,
        DEMO_APP_ID,
        "fresh-device",
        &UpsertDevice {
            version_name: Some("1.0.1".into()),
            platform: Some(Platform::Ios),
            ..Default::default()
        },
        &channel,
    )
    .unwrap();

    assert_eq!(linked.device.device_id, "fresh-device");
    assert_eq!(linked.channel.as_deref(), Some(NO_ACCESS_CHANNEL));
    assert_eq!(linked.device.platform, Some(Platform::Ios));
    assert_eq!(queries::count_devices_for_app(&conn, DEMO_APP_ID).unwrap(), 2);
}

#[test]
fn test_unlink_reports_whether_override_existed() {
    let pool = seeded_pool();
    let mut conn = pool.get().unwrap();
    let channel = queries::get_channel_by_name(&conn, DEMO_APP_ID, PRODUCTION_CHANNEL)
        .unwrap()
        .unwrap();

    queries::link_device(
        &mut conn,
        DEMO_APP_ID,
        SEEDED_DEVICE_ID,
        &UpsertDevice::default(),
        &channel,
    )
    .unwrap();

    assert!(queries::unlink_device(&conn, DEMO_APP_ID, SEEDED_DEVICE_ID).unwrap());
    assert!(!queries::unlink_device(&conn, DEMO_APP_ID, SEEDED_DEVICE_ID).unwrap());
    assert!(!queries::unlink_device(&conn, DEMO_APP_ID, "never-seen").unwrap());
}

#[test]
fn test_devices_are_scoped_per_app() {
    let pool = seeded_pool();
    let conn = pool.get().unwrap();

    assert!(queries::get_device(&conn, OTHER_APP_ID, SEEDED_DEVICE_ID)
        .unwrap()
        .is_none());
    assert!(queries::list_devices_for_app(&conn, OTHER_APP_ID, 50, 0)
        .unwrap()
        .is_empty());
}

#[test]
fn test_deleting_channel_drops_override() {
    let pool = seeded_pool();
    let mut conn = pool.get().unwrap();
    let channel = queries::get_channel_by_name(&conn, DEMO_APP_ID, NO_ACCESS_CHANNEL)
        .unwrap()
        .unwrap();
    queries::link_device(
        &mut conn,
        DEMO_APP_ID,
        SEEDED_DEVICE_ID,
        &UpsertDevice::default(),
        &channel,
    )
    .unwrap();

    conn.execute("DELETE FROM channels WHERE id = ?1", [&channel.id])
        .unwrap();

    let device = queries::get_device(&conn, DEMO_APP_ID, SEEDED_DEVICE_ID)
        .unwrap()
        .unwrap();
    assert!(device.channel.is_none());
}
