use crate::keyframe::Keyframe;

/// How far a cursor scans from its last position before falling back to a
/// binary search.
const MAX_SCAN_OFFSET: usize = 3;

/// The bracketing keyframe pair for a query time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameIndices {
    pub frame0: usize,
    pub frame1: usize,
    /// Blend factor between `frame0` and `frame1`, in `[0, 1)`.
    pub interpolation: f32,
}

impl FrameIndices {
    /// Hold a single keyframe without blending.
    #[inline]
    #[must_use]
    pub const fn hold(frame: usize) -> Self {
        Self {
            frame0: frame,
            frame1: frame,
            interpolation: 0.0,
        }
    }
}

/// Remembers where the previous keyframe lookup landed on a track.
///
/// Playback time is almost always monotonic, so the next bracket is usually
/// the same one or a neighbour. A stale cursor (clip switched, big seek) only
/// costs a binary search; results never depend on the cursor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyframeCursor {
    last_index: usize,
}

impl KeyframeCursor {
    #[inline]
    pub fn reset(&mut self) {
        self.last_index = 0;
    }

    #[inline]
    #[must_use]
    pub fn last_index(&self) -> usize {
        self.last_index
    }
}

/// Keyframe track of one bone. Keyframes are kept in ascending time order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneAnimation {
    pub bone_name: String,
    keyframes: Vec<Keyframe>,
}

impl BoneAnimation {
    #[must_use]
    pub fn new(bone_name: impl Into<String>, keyframes: Vec<Keyframe>) -> Self {
        Self {
            bone_name: bone_name.into(),
            keyframes,
        }
    }

    #[inline]
    #[must_use]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Index of the first keyframe that is earlier than its predecessor.
    #[must_use]
    pub fn first_unsorted_index(&self) -> Option<usize> {
        self.keyframes
            .windows(2)
            .position(|pair| pair[1].time < pair[0].time)
            .map(|i| i + 1)
    }

    /// Finds the keyframes bracketing `time` (clip ticks) with a linear scan.
    ///
    /// - Empty track: `(0, 0, 0.0)`.
    /// - Before the first keyframe: holds the first keyframe.
    /// - At or past the last keyframe: holds the last keyframe.
    /// - Otherwise the pair `[i, i + 1)` with `key[i].time <= time < key[i + 1].time`.
    #[must_use]
    pub fn frame_indices(&self, time: f32) -> FrameIndices {
        let Some(last) = self.keyframes.len().checked_sub(1) else {
            return FrameIndices::hold(0);
        };
        if time < self.keyframes[0].time {
            return FrameIndices::hold(0);
        }

        for (i, pair) in self.keyframes.windows(2).enumerate() {
            if time >= pair[0].time && time < pair[1].time {
                return Self::bracket(i, &pair[0], &pair[1], time);
            }
        }

        FrameIndices::hold(last)
    }

    /// Same result as [`frame_indices`](Self::frame_indices), starting the
    /// search from where `cursor` last landed.
    ///
    /// Keyframes must be sorted by time ([`AnimationClip::validate`] checks
    /// this); on an unsorted track the two searches may disagree.
    ///
    /// [`AnimationClip::validate`]: crate::clip::AnimationClip::validate
    pub fn frame_indices_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> FrameIndices {
        let len = self.keyframes.len();
        if len == 0 {
            cursor.reset();
            return FrameIndices::hold(0);
        }
        if time < self.keyframes[0].time {
            cursor.last_index = 0;
            return FrameIndices::hold(0);
        }
        // The linear scan also ends up holding the last keyframe on NaN.
        if time.is_nan() || time >= self.keyframes[len - 1].time {
            cursor.last_index = len - 1;
            return FrameIndices::hold(len - 1);
        }

        // From here `key[0] <= time < key[len - 1]`, so `len >= 2` and a bracket exists.
        let last_start = len - 2;
        let start = cursor.last_index.min(last_start);

        let found = if time >= self.keyframes[start].time {
            (start..=(start + MAX_SCAN_OFFSET).min(last_start))
                .find(|&idx| time < self.keyframes[idx + 1].time)
        } else {
            (1..=MAX_SCAN_OFFSET)
                .map_while(|offset| start.checked_sub(offset))
                .find(|&idx| time >= self.keyframes[idx].time)
        };

        let index = found.unwrap_or_else(|| {
            let next = self.keyframes.partition_point(|key| key.time <= time);
            next.saturating_sub(1).min(last_start)
        });

        cursor.last_index = index;
        Self::bracket(index, &self.keyframes[index], &self.keyframes[index + 1], time)
    }

    /// Interpolated pose at `time`; the identity pose for an empty track.
    #[must_use]
    pub fn sample(&self, time: f32) -> Keyframe {
        self.resolve(self.frame_indices(time), time)
    }

    pub fn sample_with_cursor(&self, time: f32, cursor: &mut KeyframeCursor) -> Keyframe {
        let indices = self.frame_indices_with_cursor(time, cursor);
        self.resolve(indices, time)
    }

    fn resolve(&self, indices: FrameIndices, time: f32) -> Keyframe {
        match (self.keyframes.get(indices.frame0), self.keyframes.get(indices.frame1)) {
            (Some(k0), Some(k1)) if indices.frame0 != indices.frame1 => {
                Keyframe::interpolate(k0, k1, indices.interpolation)
            }
            (Some(k0), _) => *k0,
            _ => Keyframe::new(time),
        }
    }

    #[inline]
    fn bracket(index: usize, k0: &Keyframe, k1: &Keyframe, time: f32) -> FrameIndices {
        FrameIndices {
            frame0: index,
            frame1: index + 1,
            interpolation: (time - k0.time) / (k1.time - k0.time),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    fn track(times: &[f32]) -> BoneAnimation {
        let keyframes = times
            .iter()
            .map(|&t| Keyframe::new(t).with_translation(Vec3::new(t, 0.0, 0.0)))
            .collect();
        BoneAnimation::new("bone", keyframes)
    }

    #[test]
    fn test_empty_track_holds_zero() {
        let empty = BoneAnimation::new("bone", Vec::new());
        assert_eq!(empty.frame_indices(3.0), FrameIndices::hold(0));
        let mut cursor = KeyframeCursor::default();
        assert_eq!(empty.frame_indices_with_cursor(3.0, &mut cursor), FrameIndices::hold(0));
        assert_eq!(empty.sample(3.0).translation, Vec3::ZERO);
    }

    #[test]
    fn test_exact_last_time_holds_last() {
        let t = track(&[0.0, 1.0, 2.0]);
        assert_eq!(t.frame_indices(2.0), FrameIndices::hold(2));
    }

    #[test]
    fn test_duplicate_timestamps_skip_empty_interval() {
        let t = track(&[0.0, 1.0, 1.0, 2.0]);
        let indices = t.frame_indices(1.0);
        assert_eq!((indices.frame0, indices.frame1), (2, 3));
        assert!(indices.interpolation.abs() < f32::EPSILON);

        let mut cursor = KeyframeCursor::default();
        assert_eq!(t.frame_indices_with_cursor(1.0, &mut cursor), indices);
    }

    #[test]
    fn test_first_unsorted_index() {
        assert_eq!(track(&[0.0, 1.0, 2.0]).first_unsorted_index(), None);
        assert_eq!(track(&[0.0, 2.0, 1.0]).first_unsorted_index(), Some(2));
    }

    #[test]
    fn test_cursor_tracks_last_bracket() {
        let t = track(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        let mut cursor = KeyframeCursor::default();

        t.frame_indices_with_cursor(2.5, &mut cursor);
        assert_eq!(cursor.last_index(), 2);

        // Beyond the scan window: binary search fallback.
        t.frame_indices_with_cursor(8.5, &mut cursor);
        assert_eq!(cursor.last_index(), 8);

        // Short step backwards.
        t.frame_indices_with_cursor(6.2, &mut cursor);
        assert_eq!(cursor.last_index(), 6);

        t.frame_indices_with_cursor(20.0, &mut cursor);
        assert_eq!(cursor.last_index(), 9);
    }

    #[test]
    fn test_cursor_matches_linear_scan_in_both_directions() {
        let t = track(&[0.0, 0.5, 1.0, 1.0, 3.0, 3.5, 7.0, 7.25, 8.0]);
        let mut cursor = KeyframeCursor::default();

        let forward = (0..=90).map(|i| i as f32 * 0.1 - 0.5);
        let backward = (0..=90).rev().map(|i| i as f32 * 0.1 - 0.5);
        let jumps = [7.9, 0.1, 3.2, 3.2, 0.0, 8.0, 1.0];

        for time in forward.chain(backward).chain(jumps) {
            let expected = t.frame_indices(time);
            let actual = t.frame_indices_with_cursor(time, &mut cursor);
            assert_eq!(actual, expected, "time={time}");
        }
    }
}
