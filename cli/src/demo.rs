use lookout::ServiceRecord;

/// Canned records standing in for live discovery in offline mode.
pub fn records() -> Vec<ServiceRecord> {
    vec![
        ServiceRecord {
            name: "Bandsaw._device-info._tcp.local.".into(),
            host: "bandsaw.local.".into(),
            addr_v4: Some("192.168.1.21".parse().unwrap()),
            addr_v6: None,
            port: 9,
            info: "model=J4105|osxvers=20".into(),
        },
        ServiceRecord {
            name: "Bandsaw._ssh._tcp.local.".into(),
            host: "bandsaw.local.".into(),
            addr_v4: Some("192.168.1.21".parse().unwrap()),
            addr_v6: None,
            port: 22,
            info: String::new(),
        },
        ServiceRecord {
            name: "Lathe._esphomelib._tcp.local.".into(),
            host: "lathe.local.".into(),
            addr_v4: Some("192.168.1.48".parse().unwrap()),
            addr_v6: None,
            port: 6053,
            info: "esphome=true|board=esp32dev|version=2024.6.4".into(),
        },
        ServiceRecord {
            name: "Planer._esphomelib._tcp.local.".into(),
            host: "planer.local.".into(),
            addr_v4: Some("192.168.1.49".parse().unwrap()),
            addr_v6: None,
            port: 6053,
            info: "esphome=true|board=esp32c3|version=2024.5.1".into(),
        },
        ServiceRecord {
            name: "Jointer._printer._tcp.local.".into(),
            host: "jointer.local.".into(),
            addr_v4: Some("192.168.1.9".parse().unwrap()),
            addr_v6: None,
            port: 515,
            info: "duplex=true".into(),
        },
        ServiceRecord {
            name: "Workbench._smb._tcp.local.".into(),
            host: "workbench.local.".into(),
            addr_v4: Some("192.168.1.4".parse().unwrap()),
            addr_v6: Some("fe80::1c2a:8bff:fe4d:9001".parse().unwrap()),
            port: 445,
            info: String::new(),
        },
        ServiceRecord {
            name: "Loft._airplay._tcp.local.".into(),
            host: "loft.local.".into(),
            addr_v4: Some("192.168.1.254".parse().unwrap()),
            addr_v6: None,
            port: 7000,
            info: "model=AudioAccessory5,1".into(),
        },
    ]
}
