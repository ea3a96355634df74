//! Sample `v4l2-ctl` output captured from real hardware

/// Laptop with a built-in camera and a USB camera plugged in later
pub const LAPTOP_WITH_USB: &str = "\
Integrated Camera: Integrated C (usb-0000:00:14.0-8):
\t/dev/video0
\t/dev/video1
\t/dev/media0

USB Camera: USB Camera (usb-0000:00:14.0-2):
\t/dev/video2
\t/dev/video3
\t/dev/media1

";

/// Laptop with only its built-in camera
pub const INTEGRATED_ONLY: &str = "\
Integrated Camera: Integrated C (usb-0000:00:14.0-8):
\t/dev/video0
\t/dev/video1
\t/dev/media0

";

/// Non-camera V4L2 devices only
pub const NO_CAMERAS: &str = "\
bcm2835-codec-decode (platform:bcm2835-codec):
\t/dev/media2

";

/// `--list-formats-ext` for the USB camera in [`LAPTOP_WITH_USB`]
///
/// Largest discrete size: 2592x1944.
pub const USB_FORMATS: &str = "\
ioctl: VIDIOC_ENUM_FMT
\tType: Video Capture

\t[0]: 'MJPG' (Motion-JPEG, compressed)
\t\tSize: Discrete 1920x1080
\t\t\tInterval: Discrete 0.033s (30.000 fps)
\t\tSize: Discrete 2592x1944
\t\t\tInterval: Discrete 0.067s (15.000 fps)
\t\tSize: Discrete 1280x720
\t\t\tInterval: Discrete 0.033s (30.000 fps)
\t[1]: 'YUYV' (YUYV 4:2:2)
\t\tSize: Discrete 640x480
\t\t\tInterval: Discrete 0.033s (30.000 fps)
\t\tSize: Discrete 2592x1944
\t\t\tInterval: Discrete 0.500s (2.000 fps)
";

/// `--list-formats-ext` for a device that only advertises stepwise sizes
pub const STEPWISE_FORMATS: &str = "\
ioctl: VIDIOC_ENUM_FMT
\tType: Video Capture

\t[0]: 'YU12' (Planar YUV 4:2:0)
\t\tSize: Stepwise 32x32 - 2592x1944 with step 2/2
";

/// `--list-ctrls` for the USB camera
pub const USB_CONTROLS: &str = "\
User Controls

                     brightness 0x00980900 (int)    : min=-64 max=64 step=1 default=0 value=0
                       contrast 0x00980901 (int)    : min=0 max=95 step=1 default=0 value=0

Camera Controls

  focus_automatic_continuous 0x009a090c (bool)   : default=1 value=1
              focus_absolute 0x009a090a (int)    : min=0 max=1023 step=1 default=0 value=0 flags=inactive
";
