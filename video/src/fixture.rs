//! Tiny MP4 files for tests.

use mp4::{AvcConfig, Bytes, MediaConfig, Mp4Config, Mp4Sample, Mp4Writer, TrackConfig, TrackType};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const WIDTH: u16 = 320;
pub const HEIGHT: u16 = 240;
/// One frame every 100 ms.
pub const FRAME_MS: u32 = 100;

/// Write a 320x240 H.264 clip of `frames` placeholder samples to `dir/file`.
pub fn write_clip(dir: &Path, file: &str, frames: u32) -> PathBuf {
    let path = dir.join(file);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    let config = Mp4Config {
        major_brand: "isom".parse().unwrap(),
        minor_version: 512,
        compatible_brands: vec!["isom".parse().unwrap(), "avc1".parse().unwrap()],
        timescale: 1000,
    };
    let out = BufWriter::new(std::fs::File::create(&path).unwrap());
    let mut writer = Mp4Writer::write_start(out, &config).unwrap();
    writer
        .add_track(&TrackConfig {
            track_type: TrackType::Video,
            timescale: 1000,
            language: "und".into(),
            media_conf: MediaConfig::AvcConfig(AvcConfig {
                width: WIDTH,
                height: HEIGHT,
                seq_param_set: vec![0x67, 0x42, 0xc0, 0x1e],
                pic_param_set: vec![0x68, 0xce, 0x3c, 0x80],
            }),
        })
        .unwrap();

    for frame in 0..frames {
        let sample = Mp4Sample {
            start_time: u64::from(frame * FRAME_MS),
            duration: FRAME_MS,
            rendering_offset: 0,
            is_sync: frame == 0,
            bytes: Bytes::from(vec![0u8; 32]),
        };
        writer.write_sample(1, &sample).unwrap();
    }
    writer.write_end().unwrap();
    writer.into_writer().flush().unwrap();
    path
}

/// A fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("playkit-video-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
