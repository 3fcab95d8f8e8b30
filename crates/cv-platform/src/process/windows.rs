use std::ffi::OsString;
use std::io::Cursor;
use std::mem::{size_of, zeroed};
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};
use std::ptr::null_mut;

use async_trait::async_trait;
use cv_core::clipboard::WindowHandle;
use cv_core::ports::ProcessInfoPort;
use image::{ImageFormat, RgbaImage};
use tracing::debug;
use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::shared::windef::HWND;
use winapi::um::handleapi::CloseHandle;
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::shellapi::{SHGetFileInfoW, SHFILEINFOW, SHGFI_ICON, SHGFI_LARGEICON};
use winapi::um::winbase::QueryFullProcessImageNameW;
use winapi::um::wingdi::{
    DeleteObject, GetDIBits, GetObjectW, BITMAP, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
    DIB_RGB_COLORS,
};
use winapi::um::winnt::PROCESS_QUERY_LIMITED_INFORMATION;
use winapi::um::winuser::{
    DestroyIcon, GetDC, GetIconInfo, GetWindowThreadProcessId, ReleaseDC, ICONINFO,
};

const MAX_PATH_CHARS: usize = 32_768;

/// Owner lookup through the Win32 process and shell APIs.
pub struct Win32ProcessInfo;

fn executable_of(window: WindowHandle) -> Option<PathBuf> {
    let mut pid: DWORD = 0;
    unsafe { GetWindowThreadProcessId(window.0 as HWND, &mut pid) };
    if pid == 0 {
        return None;
    }

    let process = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, FALSE, pid) };
    if process.is_null() {
        return None;
    }

    let mut buffer = vec![0u16; MAX_PATH_CHARS];
    let mut len = buffer.len() as DWORD;
    let ok = unsafe { QueryFullProcessImageNameW(process, 0, buffer.as_mut_ptr(), &mut len) };
    unsafe { CloseHandle(process) };
    if ok == 0 || len == 0 {
        return None;
    }
    buffer.truncate(len as usize);
    Some(PathBuf::from(OsString::from_wide(&buffer)))
}

/// Large shell icon of `path` as RGBA, via the icon's colour bitmap.
fn icon_rgba(path: &Path) -> Option<RgbaImage> {
    let wide: Vec<u16> = path.as_os_str().encode_wide().chain(Some(0)).collect();
    let mut info: SHFILEINFOW = unsafe { zeroed() };
    let found = unsafe {
        SHGetFileInfoW(
            wide.as_ptr(),
            0,
            &mut info,
            size_of::<SHFILEINFOW>() as u32,
            SHGFI_ICON | SHGFI_LARGEICON,
        )
    };
    if found == 0 || info.hIcon.is_null() {
        return None;
    }

    let mut icon_info: ICONINFO = unsafe { zeroed() };
    let has_info = unsafe { GetIconInfo(info.hIcon, &mut icon_info) } != 0;
    let image = if has_info && !icon_info.hbmColor.is_null() {
        read_color_bitmap(&icon_info)
    } else {
        None
    };

    unsafe {
        if !icon_info.hbmColor.is_null() {
            DeleteObject(icon_info.hbmColor as _);
        }
        if !icon_info.hbmMask.is_null() {
            DeleteObject(icon_info.hbmMask as _);
        }
        DestroyIcon(info.hIcon);
    }
    image
}

fn read_color_bitmap(icon_info: &ICONINFO) -> Option<RgbaImage> {
    let mut bitmap: BITMAP = unsafe { zeroed() };
    let read = unsafe {
        GetObjectW(
            icon_info.hbmColor as _,
            size_of::<BITMAP>() as i32,
            &mut bitmap as *mut BITMAP as *mut _,
        )
    };
    if read == 0 || bitmap.bmWidth <= 0 || bitmap.bmHeight <= 0 {
        return None;
    }
    let (width, height) = (bitmap.bmWidth as u32, bitmap.bmHeight as u32);

    let mut header: BITMAPINFO = unsafe { zeroed() };
    header.bmiHeader = BITMAPINFOHEADER {
        biSize: size_of::<BITMAPINFOHEADER>() as u32,
        biWidth: width as i32,
        biHeight: -(height as i32),
        biPlanes: 1,
        biBitCount: 32,
        biCompression: BI_RGB,
        ..unsafe { zeroed() }
    };

    let mut pixels = vec![0u8; width as usize * height as usize * 4];
    let dc = unsafe { GetDC(null_mut()) };
    let rows = unsafe {
        GetDIBits(
            dc,
            icon_info.hbmColor,
            0,
            height,
            pixels.as_mut_ptr() as *mut _,
            &mut header,
            DIB_RGB_COLORS,
        )
    };
    unsafe { ReleaseDC(null_mut(), dc) };
    if rows == 0 {
        return None;
    }

    for px in pixels.chunks_exact_mut(4) {
        px.swap(0, 2);
    }
    RgbaImage::from_raw(width, height, pixels)
}

#[async_trait]
impl ProcessInfoPort for Win32ProcessInfo {
    fn path_of(&self, window: WindowHandle) -> Option<PathBuf> {
        executable_of(window)
    }

    async fn icon_bytes_of(&self, path: &Path) -> Option<Vec<u8>> {
        let path = path.to_path_buf();
        let encoded = tokio::task::spawn_blocking(move || {
            let image = icon_rgba(&path)?;
            let mut png = Vec::new();
            image
                .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
                .ok()?;
            Some(png)
        })
        .await;

        match encoded {
            Ok(bytes) => bytes,
            Err(err) => {
                debug!(error = %err, "Icon lookup task failed");
                None
            }
        }
    }
}
