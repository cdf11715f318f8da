//! Baked-in site content.
//!
//! Used as the initial in-memory value and as the fallback for anything the
//! store does not (yet) hold.

use super::content::{
    AboutUs, ContactInfo, ContentState, CoreValue, DynamicTitle, Feature, FloatingButtons,
    LatestProjects, LegalPage, Link, Logos, MediaType, Project, Service, SocialLink, Statistic,
    WhyChooseUs,
};
use super::icon::{FeatureIcon, FloatingIcon, IconSetting, SocialIcon, ValueIcon};
use super::record::RecordId;

const PRIVACY_POLICY: &str = r#"Your privacy is important to us. It is Kaste Brands & Designs' policy to respect your privacy regarding any information we may collect from you across our website, and other sites we own and operate.

We only ask for personal information when we truly need it to provide a service to you. We collect it by fair and lawful means, with your knowledge and consent. We also let you know why we’re collecting it and how it will be used.

We only retain collected information for as long as necessary to provide you with your requested service. What data we store, we’ll protect within commercially acceptable means to prevent loss and theft, as well as unauthorized access, disclosure, copying, use or modification.

We don’t share any personally identifying information publicly or with third-parties, except when required to by law.

Our website may link to external sites that are not operated by us. Please be aware that we have no control over the content and practices of these sites, and cannot accept responsibility or liability for their respective privacy policies.

You are free to refuse our request for your personal information, with the understanding that we may be unable to provide you with some of your desired services.

Your continued use of our website will be regarded as acceptance of our practices around privacy and personal information. If you have any questions about how we handle user data and personal information, feel free to contact us."#;

const TERMS_OF_SERVICE: &str = r#"1. Terms
By accessing the website at Kaste Brands & Designs, you are agreeing to be bound by these terms of service, all applicable laws and regulations, and agree that you are responsible for compliance with any applicable local laws. If you do not agree with any of these terms, you are prohibited from using or accessing this site. The materials contained in this website are protected by applicable copyright and trademark law.

2. Use License
Permission is granted to temporarily download one copy of the materials (information or software) on Kaste Brands & Designs' website for personal, non-commercial transitory viewing only. This is the grant of a license, not a transfer of title, and under this license you may not: modify or copy the materials; use the materials for any commercial purpose, or for any public display (commercial or non-commercial); attempt to decompile or reverse engineer any software contained on Kaste Brands & Designs' website; remove any copyright or other proprietary notations from the materials; or transfer the materials to another person or "mirror" the materials on any other server. This license shall automatically terminate if you violate any of these restrictions and may be terminated by Kaste Brands & Designs at any time. Upon terminating your viewing of these materials or upon the termination of this license, you must destroy any downloaded materials in your possession whether in electronic or printed format.

3. Disclaimer
The materials on Kaste Brands & Designs' website are provided on an 'as is' basis. Kaste Brands & Designs makes no warranties, expressed or implied, and hereby disclaims and negates all other warranties including, without limitation, implied warranties or conditions of merchantability, fitness for a particular purpose, or non-infringement of intellectual property or other violation of rights. Further, Kaste Brands & Designs does not warrant or make any representations concerning the accuracy, likely results, or reliability of the use of the materials on its website or otherwise relating to such materials or on any sites linked to this site.

4. Limitations
In no event shall Kaste Brands & Designs or its suppliers be liable for any damages (including, without limitation, damages for loss of data or profit, or due to business interruption) arising out of the use or inability to use the materials on Kaste Brands & Designs' website, even if Kaste Brands & Designs or a Kaste Brands & Designs authorized representative has been notified orally or in writing of the possibility of such damage. Because some jurisdictions do not allow limitations on implied warranties, or limitations of liability for consequential or incidental damages, these limitations may not apply to you.

5. Accuracy of materials
The materials appearing on Kaste Brands & Designs' website could include technical, typographical, or photographic errors. Kaste Brands & Designs does not warrant that any of the materials on its website are accurate, complete or current. Kaste Brands & Designs may make changes to the materials contained on its website at any time without notice. However Kaste Brands & Designs does not make any commitment to update.

6. Links
Kaste Brands & Designs has not reviewed all of the sites linked to its website and is not responsible for the contents of any such linked site. The inclusion of any link does not imply endorsement by Kaste Brands & Designs of the site. Use of any such linked website is at the user's own risk.

7. Modifications
Kaste Brands & Designs may revise these terms of service for its website at any time without notice. By using this website you are agreeing to be bound by the then current version of these terms of service.

8. Governing Law
These terms and conditions are governed by and construed in accordance with the laws of our state and you irrevocably submit to the exclusive jurisdiction of the courts in that State or location."#;

const UNSPLASH: &str = "https://images.unsplash.com";

fn photo(id: &str, width: u32) -> String {
    format!("{}/photo-{}?q=80&w={}&auto=format&fit=crop", UNSPLASH, id, width)
}

fn service(id: &str, title: &str, description: &str) -> Service {
    Service {
        id: RecordId::new(id),
        title: title.to_string(),
        description: description.to_string(),
    }
}

fn link(id: &str, text: &str, url: &str) -> Link {
    Link {
        id: RecordId::new(id),
        text: text.to_string(),
        url: url.to_string(),
    }
}

fn social(id: &str, name: SocialIcon, url: &str) -> SocialLink {
    SocialLink {
        id: RecordId::new(id),
        name,
        url: url.to_string(),
    }
}

fn project(id: &str, title: &str, description: &str, cover: String, category: &str) -> Project {
    Project {
        id: RecordId::new(id),
        title: title.to_string(),
        description: description.to_string(),
        media_url: cover,
        media_type: MediaType::Image,
        category: category.to_string(),
        project_url: Some("#".to_string()),
        gallery: Vec::new(),
    }
}

impl Default for ContentState {
    fn default() -> Self {
        Self {
            site_name: "Kaste Brands & Designs".to_string(),
            tagline: "Bespoke AI Solutions & Compelling Brand Identities".to_string(),
            dynamic_title: DynamicTitle::default(),
            services: vec![
                service("s1", "AI Systems", "Bespoke artificial intelligence systems tailored to your business needs."),
                service("s2", "AI Integrations & Solutions", "Seamlessly integrate AI into your existing infrastructure for enhanced efficiency."),
                service("s3", "Brand Identity", "Crafting memorable brand identities that resonate with your target audience."),
                service("s4", "Modern Websites", "Developing responsive, high-performance websites with a modern aesthetic."),
                service("s5", "Mobile Applications", "Building intuitive and engaging mobile apps for both iOS and Android."),
                service("s6", "Automated Systems", "Designing automated workflows to streamline operations and boost productivity."),
                service("s7", "Branding & Graphics", "Creating stunning visuals and graphics that elevate your brand's presence."),
                service("s8", "Digital Marketing", "Strategic digital marketing campaigns to drive growth and engagement."),
            ],
            header_links: vec![
                link("h1", "Home", "#/"),
                link("h2", "Services", "#services"),
                link("h3", "Projects", "#/projects"),
                link("h4", "About Us", "#about"),
                link("h5", "Contact", "#/contact"),
            ],
            footer_links: vec![
                link("f1", "Home", "#/"),
                link("f2", "Privacy Policy", "#/privacy-policy"),
                link("f3", "Terms of Service", "#/terms-of-service"),
            ],
            social_links: vec![
                social("so1", SocialIcon::Twitter, "https://twitter.com"),
                social("so2", SocialIcon::GitHub, "https://github.com"),
                social("so3", SocialIcon::LinkedIn, "https://linkedin.com"),
                social("so4", SocialIcon::TikTok, "https://tiktok.com"),
            ],
            whats_app_number: "1234567890".to_string(),
            ai_model: "gemini-2.5-flash-preview-04-17".to_string(),
            logos: Logos {
                header: "/logo.svg".to_string(),
                footer: "/logo.svg".to_string(),
            },
            about_us: AboutUs::default(),
            why_choose_us: WhyChooseUs::default(),
            latest_projects: LatestProjects::default(),
            privacy_policy: LegalPage {
                title: "Privacy Policy".to_string(),
                last_updated: "2024-07-28".to_string(),
                content: PRIVACY_POLICY.to_string(),
            },
            terms_of_service: LegalPage {
                title: "Terms of Service".to_string(),
                last_updated: "2024-07-28".to_string(),
                content: TERMS_OF_SERVICE.to_string(),
            },
            contact_info: ContactInfo {
                email: "contact@kaste.design".to_string(),
                phone: "+1 (555) 123-4567".to_string(),
                address: "123 Innovation Drive, Tech City, 12345".to_string(),
                map_embed_url: "https://www.google.com/maps/embed?pb=!1m18!1m12!1m3!1d21387.14723910996!2d-122.09151163456868!3d37.4215286954625!2m3!1f0!2f0!3f0!3m2!1i1024!2i768!4f13.1!3m3!1m2!1s0x808fba024251be6d%3A0xdb0c7b50036f0e45!2sGoogleplex!5e0!3m2!1sen!2sus!4v1676902484738!5m2!1sen!2sus".to_string(),
            },
            contact_form_recipient_email: "kamaustephenpaul@gmail.com".to_string(),
            floating_buttons: FloatingButtons::default(),
        }
    }
}

impl Default for DynamicTitle {
    fn default() -> Self {
        Self {
            prefix: "We Build ".to_string(),
            rotating_words: vec![
                "Extraordinary Brands".to_string(),
                "Intelligent AI".to_string(),
                "Modern Websites".to_string(),
            ],
            suffix: ".".to_string(),
        }
    }
}

impl Default for AboutUs {
    fn default() -> Self {
        Self {
            introduction: "Kaste Brands & Designs is a forward-thinking digital agency specializing in creating bespoke AI solutions and compelling brand identities. We merge cutting-edge technology with creative design to build extraordinary digital experiences. Our team is passionate about innovation and dedicated to helping our clients thrive in an ever-evolving digital landscape.".to_string(),
            mission: "Our mission is to empower businesses by delivering intelligent, beautiful, and intuitive digital solutions. We strive to demystify complex technology and make it an accessible, powerful tool for growth and connection.".to_string(),
            vision: "We envision a future where technology and human-centric design work in perfect harmony, creating seamless interactions that enrich lives and drive progress. We aim to be at the forefront of this digital evolution, pioneering change and setting new standards for excellence.".to_string(),
            values: vec![
                CoreValue {
                    id: RecordId::new("v1"),
                    icon: ValueIcon::Lightbulb,
                    title: "Innovation".to_string(),
                    description: "We constantly explore new frontiers, pushing the boundaries of what's possible with AI and design.".to_string(),
                },
                CoreValue {
                    id: RecordId::new("v2"),
                    icon: ValueIcon::UsersGroup,
                    title: "Collaboration".to_string(),
                    description: "We believe the best results come from true partnership, working hand-in-hand with our clients.".to_string(),
                },
                CoreValue {
                    id: RecordId::new("v3"),
                    icon: ValueIcon::ShieldCheck,
                    title: "Integrity".to_string(),
                    description: "We build with purpose and principle, ensuring our solutions are ethical, transparent, and reliable.".to_string(),
                },
            ],
            media_url: photo("1557804506-669a67965ba0", 2574),
            media_type: MediaType::Image,
        }
    }
}

impl Default for WhyChooseUs {
    fn default() -> Self {
        Self {
            title: "Why Partner with Kaste?".to_string(),
            features: vec![
                Feature {
                    id: RecordId::new("w1"),
                    icon: FeatureIcon::Innovation,
                    title: "Pioneering Innovation".to_string(),
                    description: "We stay at the forefront of AI and design trends to deliver cutting-edge solutions.".to_string(),
                },
                Feature {
                    id: RecordId::new("w2"),
                    icon: FeatureIcon::Quality,
                    title: "Uncompromising Quality".to_string(),
                    description: "Our commitment to excellence ensures robust, scalable, and polished final products.".to_string(),
                },
                Feature {
                    id: RecordId::new("w3"),
                    icon: FeatureIcon::Partnership,
                    title: "Collaborative Partnership".to_string(),
                    description: "We work with you as a true partner, aligning our strategy with your business goals.".to_string(),
                },
            ],
            statistics: vec![
                Statistic { id: RecordId::new("st1"), value: "98".to_string(), suffix: "%".to_string(), label: "Client Satisfaction".to_string() },
                Statistic { id: RecordId::new("st2"), value: "50".to_string(), suffix: "+".to_string(), label: "Projects Completed".to_string() },
                Statistic { id: RecordId::new("st3"), value: "10".to_string(), suffix: "+".to_string(), label: "Years of Experience".to_string() },
                Statistic { id: RecordId::new("st4"), value: "24/7".to_string(), suffix: String::new(), label: "Dedicated Support".to_string() },
            ],
        }
    }
}

impl Default for LatestProjects {
    fn default() -> Self {
        let mut portraits = project(
            "p9",
            "Faces of the City: A Portrait Series",
            "A gallery project showcasing a series of candid and posed portraits that capture the diverse personalities and stories of people in an urban environment. Each photograph aims to reveal a unique human narrative.",
            photo("1534528741775-53994a69daeb", 2564),
            "Photography",
        )
        .with_gallery(vec![
            photo("1506794778202-cad84cf45f1d", 2574),
            photo("1494790108377-be9c29b29330", 2574),
            photo("1524504388940-b1c1722653e1", 2574),
            photo("1517841905240-472988babdf9", 2574),
            photo("1580489944761-15a19d654956", 2561),
            photo("1531746020798-e6953c6e8e04", 2560),
        ]);
        portraits.project_url = None;

        Self {
            title: "Our Latest Work".to_string(),
            projects: vec![
                project("p1", "AI-Powered E-commerce", "A personalized shopping assistant with a dynamic UI.", photo("1522204523234-8729aa6e3d5f", 2670), "AI")
                    .with_gallery(vec![
                        photo("1551288049-bebda4e38f71", 2574),
                        photo("1522204523234-8729aa6e3d5f", 2670),
                    ]),
                project("p2", "Fintech Mobile App", "A sleek, modern banking experience.", photo("1589750664879-7817b8d14615", 2574), "Mobile App"),
                project("p3", "Corporate Rebranding", "A fresh identity for a tech giant, showcasing a new logo, color palette, and brand assets.", photo("1556742044-3c52d6e88c62", 2670), "Branding")
                    .with_gallery(vec![
                        photo("1559028006-44a8a5b4809e", 2574),
                        photo("1611162616475-46b6352b126b", 2574),
                        photo("1541701494587-b959cc3f5284", 2503),
                        photo("1561998394-2396d5729729", 2564),
                        photo("1599305445671-ac291c95aaa9", 2669),
                        photo("1521123985672-356c39a838de", 2574),
                    ]),
                project("p4", "Healthcare Automation", "Streamlining patient data management.", photo("1576091160399-112ba8d25d1d", 2670), "AI"),
                project("p5", "SaaS Platform UI/UX", "An intuitive interface for a complex tool.", photo("1551288049-bebda4e38f71", 2574), "Website"),
                project("p6", "Logistics AI", "Optimizing supply chain routes.", photo("1577563908411-5ab7254a6964", 2670), "AI"),
                project("p7", "Smart Home App", "Controlling homes from anywhere.", photo("1558002038-1055907df827", 2574), "Mobile App"),
                project("p8", "Digital Art Marketplace", "A platform for NFT creators.", photo("1622737133809-d95047b9e673", 2532), "Website"),
                portraits,
            ],
        }
    }
}

impl Default for FloatingButtons {
    fn default() -> Self {
        Self {
            whats_app_icon: IconSetting::PreBuilt(FloatingIcon::WhatsApp),
            ai_assistant_icon: IconSetting::PreBuilt(FloatingIcon::Bot),
            scroll_to_top_icon: IconSetting::PreBuilt(FloatingIcon::ArrowUp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_content_is_fully_populated() {
        let content = ContentState::default();
        assert!(!content.site_name.is_empty());
        assert_eq!(content.services.len(), 8);
        assert_eq!(content.header_links.len(), 5);
        assert_eq!(content.footer_links.len(), 3);
        assert_eq!(content.social_links.len(), 4);
        assert_eq!(content.about_us.values.len(), 3);
        assert_eq!(content.why_choose_us.features.len(), 3);
        assert_eq!(content.why_choose_us.statistics.len(), 4);
        assert_eq!(content.latest_projects.projects.len(), 9);
        assert!(content.privacy_policy.content.starts_with("Your privacy is important"));
        assert!(content.terms_of_service.content.contains("8. Governing Law"));
    }

    #[test]
    fn test_default_ids_unique_per_collection() {
        let content = ContentState::default();
        let ids: HashSet<_> = content.latest_projects.projects.iter().map(|p| &p.id).collect();
        assert_eq!(ids.len(), content.latest_projects.projects.len());
        let ids: HashSet<_> = content.services.iter().map(|s| &s.id).collect();
        assert_eq!(ids.len(), content.services.len());
    }

    #[test]
    fn test_default_categories() {
        assert_eq!(
            ContentState::default().project_categories(),
            vec!["AI", "Branding", "Mobile App", "Photography", "Website"]
        );
    }

    #[test]
    fn test_default_floating_icons() {
        let buttons = FloatingButtons::default();
        assert_eq!(buttons.ai_assistant_icon, IconSetting::PreBuilt(FloatingIcon::Bot));
        assert_eq!(buttons.scroll_to_top_icon, IconSetting::PreBuilt(FloatingIcon::ArrowUp));
    }

    #[test]
    fn test_portrait_project_has_no_link() {
        let projects = LatestProjects::default().projects;
        let portraits = projects.iter().find(|p| p.id == "p9").unwrap();
        assert_eq!(portraits.project_url, None);
        assert_eq!(portraits.gallery.len(), 6);
    }
}
