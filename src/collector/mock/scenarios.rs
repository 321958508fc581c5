//! Pre-built mock source scenarios for testing.
//!
//! These scenarios provide realistic pseudo-file contents and command
//! output for testing various host conditions.

use super::source::MockSource;

const PS_HEADER: &str = "COMMAND         %CPU %MEM\n";

#[allow(dead_code)]
impl MockSource {
    /// Creates a typical lightly-loaded host.
    pub fn typical_host() -> Self {
        let mut source = Self::new();

        source.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:         8192000 kB
MemAvailable:   12000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active:          4096000 kB
Inactive:        2048000 kB
SwapTotal:       4096000 kB
SwapFree:        4096000 kB
Dirty:              1024 kB
Writeback:             0 kB
",
        );

        source.add_file(
            "/proc/net/sockstat",
            "\
sockets: used 296
TCP: inuse 3 orphan 0 tw 2 alloc 9 mem 2
UDP: inuse 4 mem 1
UDPLITE: inuse 0
RAW: inuse 0
FRAG: inuse 0 memory 0
",
        );

        source.add_file(
            "/proc/net/sockstat6",
            "\
TCP6: inuse 2
UDP6: inuse 1
UDPLITE6: inuse 0
RAW6: inuse 0
FRAG6: inuse 0 memory 0
",
        );

        source.add_file(
            "/proc/net/dev",
            "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 12345678     9876    0    0    0     0          0         0 12345678     9876    0    0    0     0       0          0
  eth0:     2048       16    0    0    0     0          0         0     4096       32    0    0    0     0       0          0
",
        );

        source.add_file(
            "/proc/diskstats",
            "\
   8       0 sda 12345 100 987654 5000 6789 50 456789 3000 0 4000 8000 0 0 0 0
   8       1 sda1 10000 80 800000 4000 5000 40 400000 2500 0 3500 6500 0 0 0 0
 259       0 nvme0n1 50000 200 2000000 10000 30000 150 1500000 8000 5 15000 18000 0 0 0 0
",
        );

        source.add_file("/proc/loadavg", "0.15 0.10 0.05 1/150 1234\n");

        source.add_file(
            "/proc/stat",
            "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
cpu2 2500 125 750 20000 250 50 25 0 0 0
cpu3 2500 125 750 20000 250 50 25 0 0 0
intr 1000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 1000
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
",
        );

        source.add_command(
            &["df"],
            "\
Filesystem     1K-blocks      Used Available Use% Mounted on
/dev/sda1       51474912  21474836  27350948  44% /
/dev/nvme0n1p1 103081248  51540624  46299240  53% /data
tmpfs            8192000         0   8192000   0% /dev/shm
",
        );

        source.add_command(
            &["df", "--total"],
            "\
Filesystem     1K-blocks      Used Available Use% Mounted on
/dev/sda1       51474912  21474836  27350948  44% /
/dev/nvme0n1p1 103081248  51540624  46299240  53% /data
tmpfs            8192000         0   8192000   0% /dev/shm
total          162748160  73015460  81842188  48% -
",
        );

        source.add_command(
            &["ps", "axo", "comm,pcpu,pmem", "--sort=-pcpu"],
            format!(
                "{}{}",
                PS_HEADER,
                "\
postgres        42.3  8.1
[kworker/0:1]    3.0  0.0
/usr/bin/redis-server  2.5  1.2
firefox          1.9  6.4
bash             0.3  0.1
"
            ),
        );

        source.add_command(
            &["ps", "axo", "comm,pcpu,pmem", "--sort=-pmem"],
            format!(
                "{}{}",
                PS_HEADER,
                "\
postgres        42.3  8.1
firefox          1.9  6.4
/usr/bin/redis-server  2.5  1.2
bash             0.3  0.1
[kworker/0:1]    3.0  0.0
"
            ),
        );

        source
    }

    /// Creates a host under heavy load: busy CPU, high load average,
    /// memory pressure and many open connections.
    pub fn saturated_host() -> Self {
        let mut source = Self::typical_host();

        source.add_file(
            "/proc/meminfo",
            "\
MemTotal:       16384000 kB
MemFree:          256000 kB
MemAvailable:     512000 kB
Buffers:           64000 kB
Cached:           256000 kB
SwapCached:       128000 kB
Active:         12000000 kB
Inactive:        3000000 kB
SwapTotal:       4096000 kB
SwapFree:        1024000 kB
Dirty:            102400 kB
Writeback:         10240 kB
",
        );

        source.add_file(
            "/proc/net/sockstat",
            "\
sockets: used 2096
TCP: inuse 512 orphan 12 tw 128 alloc 600 mem 380
UDP: inuse 64 mem 16
UDPLITE: inuse 0
RAW: inuse 0
FRAG: inuse 0 memory 0
",
        );

        source.add_file("/proc/loadavg", "4.50 3.20 2.10 8/200 5000\n");

        source.add_file(
            "/proc/stat",
            "\
cpu  80000 1000 15000 5000 500 1000 500 0 0 0
cpu0 20000 250 3750 1250 125 250 125 0 0 0
cpu1 20000 250 3750 1250 125 250 125 0 0 0
cpu2 20000 250 3750 1250 125 250 125 0 0 0
cpu3 20000 250 3750 1250 125 250 125 0 0 0
intr 5000000 50 0 0 0 0 0 0 0 1 0 0 0 100 0 0 5000
ctxt 2000000
btime 1700000000
processes 50000
procs_running 8
procs_blocked 2
",
        );

        source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::traits::TextSource;
    use std::path::Path;

    #[test]
    fn test_typical_host_has_required_sources() {
        let source = MockSource::typical_host();

        for file in [
            "/proc/meminfo",
            "/proc/net/sockstat",
            "/proc/net/sockstat6",
            "/proc/net/dev",
            "/proc/diskstats",
            "/proc/loadavg",
            "/proc/stat",
        ] {
            assert!(source.read_to_string(Path::new(file)).is_ok(), "{}", file);
        }

        assert!(source.run_command(&["df"]).is_ok());
        assert!(source.run_command(&["df", "--total"]).is_ok());
    }

    #[test]
    fn test_saturated_host_shows_high_load() {
        let source = MockSource::saturated_host();

        let loadavg = source.read_to_string(Path::new("/proc/loadavg")).unwrap();
        assert!(loadavg.starts_with("4.50"));

        let meminfo = source.read_to_string(Path::new("/proc/meminfo")).unwrap();
        assert!(meminfo.contains("MemFree:          256000 kB"));
    }
}
