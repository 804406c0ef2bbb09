use std::collections::{HashMap, HashSet};
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};
use review_batch_common::format::link_line;
use review_batch_common::{
    clipboard_text, photo, BatchProgress, BatchStart, Error as CommonError, NormalizeOptions,
    Partition, ReviewItem, Stats, COPY_SUCCESS_MESSAGE, INVALID_DATA_MESSAGE,
};
use tracing::{debug, warn};

use crate::io::{default_data_path, read_data_file, thumbnail_pixels, write_data_file};
use crate::model::AppState;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp"];

pub struct DesktopApp {
    state: AppState,
    normalize: NormalizeOptions,
    status: String,
    /// 閉じるまで他の操作を受け付けない通知
    notice: Option<String>,
    photo_rx: Receiver<PhotoDecoded>,
    photo_tx: Sender<PhotoDecoded>,
    thumbs: HashMap<usize, egui::TextureHandle>,
    thumb_rx: Receiver<ThumbData>,
    thumb_tx: Sender<ThumbData>,
    thumb_inflight: HashSet<usize>,
    thumb_failed: HashSet<usize>,
    pending_thumbs: Vec<ThumbData>,
}

struct PhotoDecoded {
    generation: u64,
    slot: usize,
    photo: Option<String>,
}

struct ThumbData {
    epoch: u64,
    index: usize,
    size: [usize; 2],
    pixels: Vec<u8>,
}

enum CardAction {
    Copy(usize),
    Toggle(usize),
}

impl DesktopApp {
    fn pick_photos(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .add_filter("Images", IMAGE_EXTENSIONS)
            .pick_files()
        {
            self.state.photo_paths = paths;
        }
    }

    fn generate(&mut self) {
        let photo_count = self.state.photo_paths.len();
        let start = self.state.board.start_batch(
            &self.state.reviews_input,
            &self.state.link_input,
            photo_count,
        );
        match start {
            Ok(BatchStart::Rendered(stats)) => self.on_replaced(stats),
            Ok(BatchStart::Pending { generation, photos }) => {
                self.status = format!("Loading photos 0/{photos}...");
                self.spawn_photo_decodes(generation, self.state.photo_paths.clone());
            }
            Err(err) => self.status = format!("Generate failed: {err}"),
        }
    }

    fn spawn_photo_decodes(&self, generation: u64, paths: Vec<PathBuf>) {
        for (slot, path) in paths.into_iter().enumerate() {
            let sender = self.photo_tx.clone();
            let options = self.normalize;
            std::thread::spawn(move || {
                // 失敗・異常終了でも必ずスロットを報告する
                let loaded = std::panic::catch_unwind(AssertUnwindSafe(|| {
                    photo::load_photo(&path, Some(&options))
                }));
                let photo = match loaded {
                    Ok(Ok(data_url)) => Some(data_url),
                    Ok(Err(err)) => {
                        warn!(path = %path.display(), error = %err, "photo decode failed");
                        None
                    }
                    Err(_) => {
                        warn!(path = %path.display(), "photo decode panicked");
                        None
                    }
                };
                let _ = sender.send(PhotoDecoded { generation, slot, photo });
            });
        }
    }

    fn on_replaced(&mut self, stats: Stats) {
        self.state.epoch += 1;
        self.thumbs.clear();
        self.thumb_inflight.clear();
        self.thumb_failed.clear();
        self.pending_thumbs.clear();
        self.status = format!("{} reviews", stats.total);
    }

    fn copy_item(&mut self, ctx: &egui::Context, index: usize) {
        let Some(item) = self.state.board.get(index) else {
            return;
        };
        let text = clipboard_text(item);
        ctx.output_mut(|o| o.copied_text = text);
        self.notice = Some(COPY_SUCCESS_MESSAGE.to_string());
    }

    fn toggle_item(&mut self, index: usize) {
        if let Err(err) = self.state.board.toggle(index) {
            self.status = format!("Toggle failed: {err}");
        }
    }

    fn save_data(&mut self, ctx: &egui::Context) {
        match self.state.board.export_snapshot() {
            Ok(data) => {
                self.state.data_text = data.clone();
                ctx.output_mut(|o| o.copied_text = data);
                self.notice = Some(COPY_SUCCESS_MESSAGE.to_string());
            }
            Err(err) => self.status = format!("Save failed: {err}"),
        }
    }

    fn save_data_to_file(&mut self) {
        let data = match self.state.board.export_snapshot() {
            Ok(data) => data,
            Err(err) => {
                self.status = format!("Save failed: {err}");
                return;
            }
        };
        let default_path = default_data_path(None);
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(
                default_path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("reviews.json"),
            )
            .save_file()
        {
            match write_data_file(&path, &data) {
                Ok(_) => {
                    self.state.data_text = data;
                    self.status = format!("Saved {}", path.display());
                }
                Err(err) => self.status = format!("Save failed: {err}"),
            }
        }
    }

    fn load_data(&mut self) {
        let data = self.state.data_text.clone();
        match self.state.board.import_snapshot(&data) {
            Ok(stats) => self.on_replaced(stats),
            Err(CommonError::InvalidData(err)) => {
                debug!(error = %err, "import rejected");
                self.notice = Some(INVALID_DATA_MESSAGE.to_string());
            }
            Err(err) => self.status = format!("Load failed: {err}"),
        }
    }

    fn load_data_from_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON", &["json", "txt"])
            .pick_file()
        else {
            return;
        };
        match read_data_file(&path) {
            Ok(content) => {
                self.state.data_text = content;
                self.load_data();
            }
            Err(err) => self.status = format!("Load failed: {err}"),
        }
    }

    fn request_thumbnail(&mut self, item: &ReviewItem) {
        let Some(photo) = item.photo.clone() else {
            return;
        };
        if self.thumbs.contains_key(&item.index)
            || self.thumb_inflight.contains(&item.index)
            || self.thumb_failed.contains(&item.index)
        {
            return;
        }
        self.thumb_inflight.insert(item.index);
        let sender = self.thumb_tx.clone();
        let epoch = self.state.epoch;
        let index = item.index;

        std::thread::spawn(move || {
            let (size, pixels) = match thumbnail_pixels(&photo) {
                Ok(thumb) => thumb,
                Err(err) => {
                    warn!(index, error = %err, "thumbnail failed");
                    ([0, 0], Vec::new())
                }
            };
            let _ = sender.send(ThumbData { epoch, index, size, pixels });
        });
    }

    fn process_pending_thumbs(&mut self, ctx: &egui::Context) {
        let pending = std::mem::take(&mut self.pending_thumbs);
        for msg in pending {
            if msg.epoch != self.state.epoch {
                continue;
            }
            if msg.size[0] == 0 || msg.size[1] == 0 {
                self.thumb_failed.insert(msg.index);
                continue;
            }
            let color_image = egui::ColorImage::from_rgba_unmultiplied(msg.size, &msg.pixels);
            let texture = ctx.load_texture(
                format!("review-photo-{}-{}", msg.epoch, msg.index),
                color_image,
                egui::TextureOptions::default(),
            );
            self.thumbs.insert(msg.index, texture);
        }
    }

    fn poll_messages(&mut self) {
        while let Ok(msg) = self.photo_rx.try_recv() {
            match self.state.board.photo_decoded(msg.generation, msg.slot, msg.photo) {
                Ok(BatchProgress::Waiting { finished, total }) => {
                    self.status = format!("Loading photos {finished}/{total}...");
                }
                Ok(BatchProgress::Rendered(stats)) => self.on_replaced(stats),
                Ok(BatchProgress::Stale) => {}
                Err(err) => self.status = format!("Photo load failed: {err}"),
            }
        }

        while let Ok(msg) = self.thumb_rx.try_recv() {
            if msg.epoch == self.state.epoch {
                self.thumb_inflight.remove(&msg.index);
            }
            self.pending_thumbs.push(msg);
        }
    }

    fn render_card(&mut self, ui: &mut egui::Ui, item: &ReviewItem, actions: &mut Vec<CardAction>) {
        let frame = egui::Frame::none()
            .fill(Color32::from_rgb(24, 28, 40))
            .stroke(egui::Stroke::new(1.0, Color32::from_gray(40)))
            .rounding(egui::Rounding::same(10.0))
            .inner_margin(egui::Margin::same(10.0));

        frame.show(ui, |ui| {
            ui.set_min_width(ui.available_width());

            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("#{}", item.index)).color(Color32::from_gray(140)));
                ui.hyperlink_to(link_line(&item.link), &item.link);
            });
            ui.label(item.text.as_str());

            if item.photo.is_some() {
                if let Some(texture) = self.thumbs.get(&item.index) {
                    let size = texture.size_vec2();
                    ui.add(egui::Image::new(texture).fit_to_exact_size(size));
                } else if self.thumb_failed.contains(&item.index) {
                    ui.label(RichText::new("Photo unavailable").color(Color32::from_gray(140)));
                } else {
                    self.request_thumbnail(item);
                    ui.label(RichText::new("Loading photo...").color(Color32::from_gray(140)));
                }
            }

            ui.horizontal(|ui| {
                if ui.button("Copy").clicked() {
                    actions.push(CardAction::Copy(item.index));
                }
                if ui.button(item.status.toggle_label()).clicked() {
                    actions.push(CardAction::Toggle(item.index));
                }
            });
        });
    }

    fn render_input(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let busy = self.state.board.is_busy();

        ui.heading("Reviews");
        ui.label("Separate reviews with a blank line.");
        ui.add(
            egui::TextEdit::multiline(&mut self.state.reviews_input)
                .desired_rows(12)
                .desired_width(f32::INFINITY),
        );

        ui.label("Link");
        ui.add(egui::TextEdit::singleline(&mut self.state.link_input).desired_width(f32::INFINITY));

        ui.horizontal(|ui| {
            if ui.add_enabled(!busy, egui::Button::new("Choose Photos")).clicked() {
                self.pick_photos();
            }
            ui.label(self.state.photo_summary());
            if !self.state.photo_paths.is_empty()
                && ui.add_enabled(!busy, egui::Button::new("Clear")).clicked()
            {
                self.state.photo_paths.clear();
            }
        });

        if ui.add_enabled(!busy, egui::Button::new("Generate")).clicked() {
            self.generate();
        }
        if let Some((finished, total)) = self.state.board.pending_progress() {
            ui.add(egui::ProgressBar::new(finished as f32 / total.max(1) as f32).show_percentage());
        }

        ui.separator();
        ui.heading("Data");
        ui.add(
            egui::TextEdit::multiline(&mut self.state.data_text)
                .desired_rows(6)
                .desired_width(f32::INFINITY),
        );
        ui.horizontal(|ui| {
            if ui.button("Save Data").clicked() {
                self.save_data(ctx);
            }
            if ui.add_enabled(!self.state.board.is_empty(), egui::Button::new("Save to File")).clicked() {
                self.save_data_to_file();
            }
        });
        ui.horizontal(|ui| {
            if ui.add_enabled(!busy, egui::Button::new("Load Data")).clicked() {
                self.load_data();
            }
            if ui.add_enabled(!busy, egui::Button::new("Load from File")).clicked() {
                self.load_data_from_file();
            }
        });
    }

    fn render_list(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let stats = self.state.board.stats();
        let mut visible = self.state.board.visible();

        ui.horizontal(|ui| {
            ui.selectable_value(&mut visible, Partition::Undone, format!("Undone ({})", stats.undone));
            ui.selectable_value(&mut visible, Partition::Done, format!("Done ({})", stats.done));
            ui.separator();
            ui.label(format!("Total: {}", stats.total));
        });
        if visible != self.state.board.visible() {
            self.state.board.show(visible);
        }
        ui.separator();

        let items: Vec<ReviewItem> = self.state.board.visible_items().cloned().collect();
        let mut actions = Vec::new();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if items.is_empty() {
                    ui.label("No reviews here.");
                }
                for item in &items {
                    self.render_card(ui, item, &mut actions);
                    ui.add_space(8.0);
                }
            });

        for action in actions {
            match action {
                CardAction::Copy(index) => self.copy_item(ctx, index),
                CardAction::Toggle(index) => self.toggle_item(index),
            }
        }
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else {
            return;
        };
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button("OK").clicked() {
                    self.notice = None;
                }
            });
    }
}

impl Default for DesktopApp {
    fn default() -> Self {
        let (photo_tx, photo_rx) = mpsc::channel();
        let (thumb_tx, thumb_rx) = mpsc::channel();
        Self {
            state: AppState::default(),
            normalize: NormalizeOptions::default(),
            status: String::new(),
            notice: None,
            photo_rx,
            photo_tx,
            thumbs: HashMap::new(),
            thumb_rx,
            thumb_tx,
            thumb_inflight: HashSet::new(),
            thumb_failed: HashSet::new(),
            pending_thumbs: Vec::new(),
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.state.board.is_busy() || !self.thumb_inflight.is_empty() || !self.pending_thumbs.is_empty() {
            ctx.request_repaint();
        }
        self.poll_messages();
        self.process_pending_thumbs(ctx);

        let interactive = self.notice.is_none();

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
        });

        egui::SidePanel::left("input")
            .resizable(true)
            .default_width(360.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(interactive, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        self.render_input(ui, ctx);
                    });
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(interactive, |ui| {
                self.render_list(ui, ctx);
            });
        });

        self.render_notice(ctx);
    }
}
