//! Smoke test of the re-exported client surface against a scripted double.

#![cfg(unix)]

use smb::{Credentials, FileMode, Share, SmbConfig};
use test_support::write_script;

#[test]
fn listing_round_trip_through_the_facade() {
    let dir = tempfile::tempdir().unwrap();
    let body = r#"cat <&3 >/dev/null
while IFS= read -r line; do
  printf 'smb: \\> \n'
  case "$line" in
    dir)
      printf '  projects                            D        0  Sun Dec 10 14:17:08 2023\n'
      printf '  notes.txt                           A      512  Mon Jan  1 10:11:12 2024\n'
      printf '\t65536 blocks of size 1024. 4096 blocks available\n'
      ;;
    *) : ;;
  esac
  printf 'smb: \\> \n'
done
"#;
    let script = write_script(dir.path(), "fake-smbclient", body);

    let share = Share::new(
        SmbConfig::new("host", "share").with_client_binary(&script),
        Credentials::new("alice", "secret"),
    );

    let entries = share.dir("/").unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].name(), "projects");
    assert!(entries[0].is_directory());
    assert!(entries[0].mode().contains(FileMode::DIRECTORY));

    assert_eq!(entries[1].name(), "notes.txt");
    assert_eq!(entries[1].size(), 512);
    assert!(!entries[1].is_directory());
}
