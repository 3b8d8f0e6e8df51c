//! Video, audio and subpicture stream attributes.

use dvd_archive_core::bits::Bits;
use dvd_archive_core::model::domain::{
    AspectRatio, AudioAttributes, AudioCoding, AudioContent, DisplayModification, FontSize,
    KaraokeChannel, KaraokeMode, Line21ClosedCaption, RenderingIntent, Resolution,
    SampleFrequency, SubpictureAttributes, SubpictureCoding, SubpictureContent, VideoAttributes,
    VideoCoding, VideoContent, VideoStandard,
};

use crate::ifo::tables::language_code;

pub fn video(raw: [u8; 2]) -> VideoAttributes {
    let [format, picture] = raw;

    let coding = match format.bits(6..=7) {
        0 => VideoCoding::Mpeg1,
        1 => VideoCoding::Mpeg2,
        other => VideoCoding::Unexpected(other),
    };
    let standard = match format.bits(4..=5) {
        0 => VideoStandard::Ntsc,
        1 => VideoStandard::Pal,
        other => VideoStandard::Unexpected(other),
    };
    let display_aspect = match format.bits(2..=3) {
        0 => AspectRatio::Classic {
            letterboxed: picture.bit(1),
        },
        3 => AspectRatio::Wide,
        other => AspectRatio::Unexpected(other),
    };

    // The permitted-display field names what is forbidden.
    let mut allowed_display = DisplayModification::empty();
    if !format.bit(0) {
        allowed_display |= DisplayModification::LETTERBOX;
    }
    if !format.bit(1) {
        allowed_display |= DisplayModification::PAN_SCAN;
    }

    let mut line21cc = Line21ClosedCaption::empty();
    line21cc.set(Line21ClosedCaption::FIRST_FIELD, picture.bit(7));
    line21cc.set(Line21ClosedCaption::SECOND_FIELD, picture.bit(6));

    let full_height = match standard {
        VideoStandard::Ntsc => Some(480),
        VideoStandard::Pal => Some(576),
        VideoStandard::Unexpected(_) => None,
    };
    let coded_picture = match picture.bits(2..=3) {
        0 => Resolution {
            width: Some(720),
            height: full_height,
        },
        1 => Resolution {
            width: Some(704),
            height: full_height,
        },
        2 => Resolution {
            width: Some(352),
            height: full_height,
        },
        _ => Resolution {
            width: Some(352),
            height: full_height.map(|h| h / 2),
        },
    };

    VideoAttributes {
        coding,
        standard,
        coded_picture,
        display_aspect,
        allowed_display,
        line21cc,
        content: if picture.bit(0) {
            VideoContent::Film
        } else {
            VideoContent::Video
        },
    }
}

pub fn audio(raw: [u8; 8]) -> AudioAttributes {
    let format = raw[0].bits(5..=7);
    let quantization = raw[1].bits(6..=7);
    let application_mode = raw[0].bits(0..=1);
    let application_info = raw[7];

    let coding = match (format, quantization) {
        (0, _) => AudioCoding::Ac3,
        (2, q) => AudioCoding::Mpeg1 {
            dynamic_range_compression: q == 1,
        },
        (3, q) => AudioCoding::Mpeg2 {
            dynamic_range_compression: q == 1,
        },
        (4, 0) => AudioCoding::Lpcm { bits_per_sample: 16 },
        (4, 1) => AudioCoding::Lpcm { bits_per_sample: 20 },
        (4, 2) => AudioCoding::Lpcm { bits_per_sample: 24 },
        (6, _) => AudioCoding::Dts,
        (f, q) => AudioCoding::Unexpected(f, q),
    };

    let sample_frequency = match raw[1].bits(4..=5) {
        0 => SampleFrequency::Hz48000,
        1 => SampleFrequency::Hz96000,
        other => SampleFrequency::Unexpected(other),
    };

    let rendering = match application_mode {
        0 => RenderingIntent::Normal,
        1 => karaoke(application_info).unwrap_or(RenderingIntent::Unexpected {
            mode: application_mode,
            info: application_info,
        }),
        2 => RenderingIntent::Surround {
            dolby_matrix_encoded: application_info.bit(3),
        },
        mode => RenderingIntent::Unexpected {
            mode,
            info: application_info,
        },
    };

    let content = match raw[5] {
        0 => AudioContent::Unspecified,
        1 => AudioContent::SourceAudio,
        2 => AudioContent::AudioDescription,
        3 => AudioContent::Commentary,
        4 => AudioContent::AlternateCommentary,
        other => AudioContent::Unexpected(other),
    };

    AudioAttributes {
        coding,
        sample_frequency,
        channel_count: raw[1].bits(0..=2) + 1,
        rendering,
        language: language(raw[0].bits(2..=3), [raw[2], raw[3]]),
        content,
    }
}

/// Karaoke rendering from the application info byte, `None` for an
/// unknown channel assignment.
fn karaoke(info: u8) -> Option<RenderingIntent> {
    use KaraokeChannel::{GuideMelody, GuideVocal, Left, Right};
    let vocal = |n: &str| GuideVocal(Some(n.to_string()));

    let channels = match info.bits(4..=6) {
        2 => vec![Left, Right],
        3 => vec![Left, GuideMelody(None), Right],
        4 => vec![Left, Right, vocal("1")],
        5 => vec![Left, GuideMelody(None), Right, vocal("1")],
        6 => vec![Left, Right, vocal("1"), vocal("2")],
        7 => vec![Left, GuideMelody(None), Right, vocal("1"), vocal("2")],
        _ => return None,
    };

    Some(RenderingIntent::Karaoke {
        version: info.bits(2..=3),
        mode: if info.bit(0) {
            KaraokeMode::Duet
        } else {
            KaraokeMode::Solo
        },
        channels,
        multi_channel_intro: info.bit(1),
    })
}

pub fn subpicture(raw: [u8; 6]) -> SubpictureAttributes {
    let coding = match raw[0].bits(5..=7) {
        0 => SubpictureCoding::Rle,
        1 => SubpictureCoding::Extended,
        other => SubpictureCoding::Unexpected(other),
    };

    let normal = FontSize::Normal;
    let large = FontSize::Large;
    let content = match raw[5] {
        0 => SubpictureContent::Unspecified,
        1 => SubpictureContent::Subtitles { font_size: normal, for_children: false },
        2 => SubpictureContent::Subtitles { font_size: large, for_children: false },
        3 => SubpictureContent::Subtitles { font_size: normal, for_children: true },
        5 => SubpictureContent::ClosedCaptions { font_size: normal, for_children: false },
        6 => SubpictureContent::ClosedCaptions { font_size: large, for_children: false },
        7 => SubpictureContent::ClosedCaptions { font_size: normal, for_children: true },
        9 => SubpictureContent::Forced,
        13 => SubpictureContent::Commentary { font_size: normal, for_children: false },
        14 => SubpictureContent::Commentary { font_size: large, for_children: false },
        15 => SubpictureContent::Commentary { font_size: normal, for_children: true },
        other => SubpictureContent::Unexpected(other),
    };

    SubpictureAttributes {
        coding,
        language: language(raw[0].bits(0..=1), [raw[2], raw[3]]),
        content,
    }
}

/// Language type 1 means the code field is valid.
fn language(language_type: u8, code: [u8; 2]) -> Option<String> {
    if language_type != 1 {
        return None;
    }
    let code = language_code(code);
    (!code.is_empty()).then_some(code)
}

#[cfg(test)]
#[path = "../tests/attributes_tests.rs"]
mod tests;
